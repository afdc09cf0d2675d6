use std::collections::VecDeque;

use crate::errors::SyncResult;

/// One page of a remote listing.
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

/// Lazily walks a paged listing from the first page, fetching the next page only when the
/// buffered one is drained. A failed fetch is yielded once and ends the walk.
pub struct PageCursor<T, F>
where
    F: FnMut(usize) -> SyncResult<Page<T>>,
{
    fetch_page: F,
    next_page: usize,
    buffer: VecDeque<T>,
    exhausted: bool,
}

impl<T, F> PageCursor<T, F>
where
    F: FnMut(usize) -> SyncResult<Page<T>>,
{
    pub fn new(fetch_page: F) -> Self {
        Self {
            fetch_page,
            next_page: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    #[cfg(test)]
    pub fn pages_fetched(&self) -> usize {
        self.next_page
    }
}

impl<T, F> Iterator for PageCursor<T, F>
where
    F: FnMut(usize) -> SyncResult<Page<T>>,
{
    type Item = SyncResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            if self.exhausted {
                return None;
            }

            match (self.fetch_page)(self.next_page) {
                Ok(page) => {
                    self.next_page += 1;
                    self.exhausted = !page.has_more || page.items.is_empty();
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncError;

    fn numbered_pages(page: usize) -> SyncResult<Page<usize>> {
        Ok(Page {
            items: vec![page * 10, page * 10 + 1],
            has_more: page < 2,
        })
    }

    #[test]
    fn walks_pages_until_last() {
        let items: Vec<usize> = PageCursor::new(numbered_pages)
            .collect::<SyncResult<_>>()
            .unwrap();

        assert_eq!(items, vec![0, 1, 10, 11, 20, 21]);
    }

    #[test]
    fn only_fetches_what_is_consumed() {
        let mut cursor = PageCursor::new(numbered_pages);
        let first_three: Vec<usize> = cursor.by_ref().take(3).map(Result::unwrap).collect();

        assert_eq!(first_three, vec![0, 1, 10]);
        assert_eq!(cursor.pages_fetched(), 2);
    }

    #[test]
    fn failed_page_ends_the_walk() {
        let mut cursor = PageCursor::new(|page| {
            if page == 0 {
                Ok(Page {
                    items: vec![1],
                    has_more: true,
                })
            } else {
                Err(SyncError::upstream("page unavailable"))
            }
        });

        assert!(matches!(cursor.next(), Some(Ok(1))));
        assert!(matches!(cursor.next(), Some(Err(SyncError::Upstream(_)))));
        assert!(cursor.next().is_none());
    }
}
