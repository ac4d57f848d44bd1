/// A rectangle in virtual-desktop coordinates.
///
/// `right` and `bottom` are exclusive. Coordinates may be negative, e.g. a
/// monitor placed left of or above the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
  pub left: i32,
  pub top: i32,
  pub right: i32,
  pub bottom: i32,
}

impl Rect {
  /// The identity of [`Self::union`]. It contains nothing and has negative size.
  pub const EMPTY: Self = Self {
    left: i32::MAX,
    top: i32::MAX,
    right: i32::MIN,
    bottom: i32::MIN,
  };

  #[inline]
  pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
    Self {
      left,
      top,
      right,
      bottom,
    }
  }

  /// Width in pixels. Computed in `i64` so that [`Self::EMPTY`] and extreme
  /// coordinates never overflow.
  #[inline]
  pub const fn width(&self) -> i64 {
    self.right as i64 - self.left as i64
  }

  #[inline]
  pub const fn height(&self) -> i64 {
    self.bottom as i64 - self.top as i64
  }

  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.width() <= 0 || self.height() <= 0
  }

  /// Return `(width, height)` if both are positive and fit in `u32`.
  pub fn size(&self) -> Option<(u32, u32)> {
    if self.is_empty() {
      return None;
    }
    Some((
      u32::try_from(self.width()).ok()?,
      u32::try_from(self.height()).ok()?,
    ))
  }

  /// The smallest rectangle containing both `self` and `other`.
  #[inline]
  pub fn union(self, other: Self) -> Self {
    Self {
      left: self.left.min(other.left),
      top: self.top.min(other.top),
      right: self.right.max(other.right),
      bottom: self.bottom.max(other.bottom),
    }
  }

  /// Fold all rectangles into their bounding box.
  /// Return [`None`] if the iterator is empty.
  pub fn bounding(rects: impl IntoIterator<Item = Self>) -> Option<Self> {
    let mut rects = rects.into_iter().peekable();
    rects.peek()?;
    Some(rects.fold(Self::EMPTY, Self::union))
  }

  /// Position of `self`'s top-left corner relative to `origin`'s top-left corner.
  ///
  /// When `origin` is a bounding box of `self` the result is never negative.
  #[inline]
  pub const fn offset_from(&self, origin: &Self) -> (i64, i64) {
    (
      self.left as i64 - origin.left as i64,
      self.top as i64 - origin.top as i64,
    )
  }

  pub const fn contains(&self, other: &Self) -> bool {
    self.left <= other.left
      && self.top <= other.top
      && self.right >= other.right
      && self.bottom >= other.bottom
  }
}
