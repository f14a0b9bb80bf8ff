//! Per-field memoization cell.

use std::future::Future;

use tokio::sync::OnceCell;

/// A value fetched at most once.
///
/// The cell is either not fetched or holds the fetched value. An empty value
/// (say, an empty list) still counts as fetched. A failed fetch leaves the cell
/// untouched so the next call tries again; concurrent first calls wait for a
/// single fetch.
#[derive(Debug)]
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memo<T> {
    /// An unfetched cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The stored value, if fetched.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Whether a value has been stored.
    #[must_use]
    pub fn is_fetched(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the stored value, running `fetch` first if there is none.
    pub async fn get_or_try_fetch<E, F, Fut>(&self, fetch: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell.get_or_try_init(fetch).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn empty_values_are_fetched_once() {
        let memo: Memo<Vec<String>> = Memo::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo
                .get_or_try_fetch(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(Vec::new())
                })
                .await
                .unwrap();
            assert!(value.is_empty());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(memo.is_fetched());
    }

    #[tokio::test]
    async fn failures_leave_the_cell_unfetched() {
        let memo: Memo<u32> = Memo::default();

        let err = memo
            .get_or_try_fetch(|| async { Err::<u32, _>("offline") })
            .await
            .unwrap_err();
        assert_eq!(err, "offline");
        assert!(!memo.is_fetched());
        assert_eq!(memo.get(), None);

        let value = memo
            .get_or_try_fetch(|| async { Ok::<_, &str>(7) })
            .await
            .unwrap();
        assert_eq!(*value, 7);
        assert_eq!(memo.get(), Some(&7));
    }
}
