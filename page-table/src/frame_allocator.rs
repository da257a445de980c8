/// Hands out frame numbers `0..frames`, always the lowest free one.
pub struct FrameAllocator {
    frames: usize,
    bitmap: Vec<u8>,
}

impl FrameAllocator {
    /// How many bytes are required to store the bitmap
    pub fn bitmap_size(frames: usize) -> usize {
        frames / 8 + if frames % 8 == 0 { 0 } else { 1 }
    }

    pub fn init(frames: usize) -> Self {
        Self {
            frames,
            bitmap: vec![0u8; Self::bitmap_size(frames)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.frames
    }

    pub fn allocate_frame(&mut self) -> Option<u32> {
        for (i, byte) in self.bitmap.iter_mut().enumerate() {
            for j in 0..8 {
                let frame = i * 8 + j;
                if frame >= self.frames {
                    break;
                }
                if *byte & (1 << j) == 0 {
                    *byte |= 1 << j;
                    return Some(frame as u32);
                }
            }
        }
        log::debug!("No free frames");
        None
    }

    pub fn deallocate_frame(&mut self, frame: u32) {
        let frame = frame as usize;
        if frame < self.frames {
            self.bitmap[frame / 8] &= !(1 << (frame % 8));
        }
    }

    pub fn is_allocated(&self, frame: u32) -> bool {
        let frame = frame as usize;
        frame < self.frames && self.bitmap[frame / 8] & (1 << (frame % 8)) != 0
    }

    pub fn allocated(&self) -> usize {
        self.bitmap.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_size() {
        assert_eq!(FrameAllocator::bitmap_size(8), 1);
        assert_eq!(FrameAllocator::bitmap_size(9), 2);
        assert_eq!(FrameAllocator::bitmap_size(100), 13);
    }

    #[test]
    fn test_allocate_frame() {
        let mut allocator = FrameAllocator::init(10);
        for expected in 0..10 {
            assert_eq!(allocator.allocate_frame(), Some(expected));
        }
        assert_eq!(allocator.allocated(), 10);
    }

    #[test]
    fn test_allocate_frame_full() {
        let mut allocator = FrameAllocator::init(3);
        allocator.allocate_frame();
        allocator.allocate_frame();
        allocator.allocate_frame();
        assert_eq!(allocator.allocate_frame(), None);
    }

    #[test]
    fn test_reuse_freed_frame() {
        let mut allocator = FrameAllocator::init(12);
        for _ in 0..12 {
            allocator.allocate_frame();
        }
        allocator.deallocate_frame(9);
        assert!(!allocator.is_allocated(9));
        assert_eq!(allocator.allocate_frame(), Some(9));

        allocator.deallocate_frame(4);
        allocator.deallocate_frame(1);
        assert_eq!(allocator.allocate_frame(), Some(1));
        assert_eq!(allocator.allocate_frame(), Some(4));
        assert_eq!(allocator.allocate_frame(), None);
    }

    #[test]
    fn test_deallocate_out_of_range() {
        let mut allocator = FrameAllocator::init(2);
        allocator.deallocate_frame(40);
        assert_eq!(allocator.allocated(), 0);
        assert!(!allocator.is_allocated(40));
    }
}
