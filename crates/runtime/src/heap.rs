use crate::error::{RuntimeError, RuntimeErrorKind};

/// The process-wide, append-only registry of array handles.
///
/// References are indices, not pointers: the interpreter copies them
/// freely across frames' operand stacks without any ownership concern,
/// and the heap can grow without invalidating a handle returned earlier.
/// There is no reclamation.
#[derive(Default)]
pub struct Heap {
    arrays: Vec<Vec<i32>>,
}

impl Heap {
    pub fn new() -> Self {
        Self { arrays: Vec::new() }
    }

    /// Takes ownership of `array` and returns a stable handle to it.
    pub fn allocate(&mut self, array: Vec<i32>) -> i32 {
        self.arrays.push(array);
        (self.arrays.len() - 1) as i32
    }

    pub fn get(&self, reference: i32) -> Result<&Vec<i32>, RuntimeError> {
        usize::try_from(reference)
            .ok()
            .and_then(|index| self.arrays.get(index))
            .ok_or_else(|| RuntimeErrorKind::InvalidHeapReference(reference).into())
    }

    pub fn get_mut(&mut self, reference: i32) -> Result<&mut Vec<i32>, RuntimeError> {
        usize::try_from(reference)
            .ok()
            .and_then(|index| self.arrays.get_mut(index))
            .ok_or_else(|| RuntimeErrorKind::InvalidHeapReference(reference).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_allocate_returns_stable_handles() {
        let mut heap = Heap::new();
        let a = heap.allocate(vec![1, 2, 3]);
        let b = heap.allocate(vec![4, 5]);

        assert_eq!(heap.get(a).unwrap(), &vec![1, 2, 3]);
        assert_eq!(heap.get(b).unwrap(), &vec![4, 5]);
    }

    #[test]
    fn test_get_mut_allows_in_place_store() {
        let mut heap = Heap::new();
        let reference = heap.allocate(vec![0, 0, 0]);
        heap.get_mut(reference).unwrap()[1] = 99;
        assert_eq!(heap.get(reference).unwrap()[1], 99);
    }

    #[test]
    fn test_invalid_reference_is_an_error() {
        let heap = Heap::new();
        assert_eq!(heap.get(42).unwrap_err().kind, RuntimeErrorKind::InvalidHeapReference(42));
        assert_eq!(heap.get(-1).unwrap_err().kind, RuntimeErrorKind::InvalidHeapReference(-1));
    }
}
