use crate::geom::Rect;

/// Borrowed binary foreground mask, row-major, one byte per pixel.
///
/// Any non-zero byte is foreground (ink). Out-of-bounds reads are background,
/// so callers may probe regions of interest without clamping first.
#[derive(Clone, Copy, Debug)]
pub struct BinaryView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned binary mask, mostly useful for tests and synthetic sheets.
#[derive(Clone, Debug)]
pub struct BinaryImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryImage {
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn view(&self) -> BinaryView<'_> {
        BinaryView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn set(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.data[y as usize * self.width + x as usize] = 1;
        }
    }

    /// Fill a rectangle with foreground pixels (clipped to the image).
    pub fn fill(&mut self, rect: Rect) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y);
            }
        }
    }
}

impl BinaryView<'_> {
    /// Foreground test; out-of-bounds coordinates read as background.
    #[inline]
    pub fn is_fore(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.data[y as usize * self.width + x as usize] != 0
    }

    /// Count of foreground pixels within `rect`.
    pub fn fore_count(&self, rect: &Rect) -> usize {
        let mut count = 0;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if self.is_fore(x, y) {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_background() {
        let img = BinaryImage::blank(4, 4);
        assert!(!img.view().is_fore(-1, 0));
        assert!(!img.view().is_fore(0, 10));
    }

    #[test]
    fn fill_and_count() {
        let mut img = BinaryImage::blank(8, 8);
        img.fill(Rect::new(2, 2, 3, 3));
        assert_eq!(img.view().fore_count(&Rect::new(0, 0, 8, 8)), 9);
        assert!(img.view().is_fore(2, 2));
        assert!(!img.view().is_fore(5, 2));
    }
}
