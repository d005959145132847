/// The in-bounds 8-neighbourhood of a cell, row by row.
#[derive(Clone, Debug)]
pub struct Neighbours {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    offset: u8,
}

impl Neighbours {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Neighbours {
        Neighbours {
            x,
            y,
            width,
            height,
            offset: 0,
        }
    }
}

impl Iterator for Neighbours {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        while self.offset < 9 {
            let offset = self.offset;
            self.offset += 1;

            // The centre cell.
            if offset == 4 {
                continue;
            }

            let nx = self.x.checked_add(offset as usize % 3).and_then(|x| x.checked_sub(1));
            let ny = self.y.checked_add(offset as usize / 3).and_then(|y| y.checked_sub(1));

            if let (Some(nx), Some(ny)) = (nx, ny) {
                if nx < self.width && ny < self.height {
                    return Some((nx, ny));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_at_edges() {
        assert_eq!(Neighbours::new(0, 0, 5, 5).count(), 3);
        assert_eq!(Neighbours::new(0, 2, 5, 5).count(), 5);
        assert_eq!(Neighbours::new(2, 2, 5, 5).count(), 8);
        assert_eq!(Neighbours::new(4, 4, 5, 5).count(), 3);
        assert_eq!(Neighbours::new(0, 0, 1, 1).count(), 0);
    }

    #[test]
    fn far_off_board_is_empty() {
        assert_eq!(Neighbours::new(usize::MAX, 0, 2, 2).count(), 0);
        assert_eq!(Neighbours::new(0, usize::MAX, 2, 2).count(), 0);
        assert_eq!(Neighbours::new(usize::MAX, usize::MAX, 2, 2).count(), 0);
    }

    #[test]
    fn row_major_order() {
        let neighbours: Vec<_> = Neighbours::new(1, 1, 3, 3).collect();

        assert_eq!(
            neighbours,
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
        );
    }
}
