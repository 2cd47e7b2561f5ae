//! Lexicographic k-combinations of `0..n`.

/// Iterator over every k-element index subset of `0..n`, in lexicographic order.
///
/// `Combinations::new(4, 2)` yields `[0,1] [0,2] [0,3] [1,2] [1,3] [2,3]`.
#[derive(Debug, Clone)]
pub(crate) struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.indices.clone();
        let k = self.indices.len();

        // Rightmost index that can still move forward
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_lexicographic_order() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }

    #[test]
    fn test_counts() {
        assert_eq!(Combinations::new(10, 5).count(), 252);
        assert_eq!(Combinations::new(10, 2).count(), 45);
        assert_eq!(Combinations::new(3, 3).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn test_first_and_last_of_ten_choose_five() {
        let all: Vec<Vec<usize>> = Combinations::new(10, 5).collect();
        assert_eq!(all.first(), Some(&vec![0, 1, 2, 3, 4]));
        assert_eq!(all.last(), Some(&vec![5, 6, 7, 8, 9]));
    }
}
