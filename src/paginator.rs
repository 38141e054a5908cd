/// Slice-based pager for the list page. Pages are 1-based.
pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    pub fn new(items: &'a [T], page_size: u32) -> Self {
        let page_count = if items.is_empty() {
            0
        } else {
            ((items.len() as u32 - 1) / page_size) + 1
        };

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        if page == 0 {
            return Err("Page has to be greater than 0".to_string());
        }
        if page > self.page_count {
            return Err(format!(
                "Page has to be less than page_count ({})",
                self.page_count
            ));
        }

        let start = ((page - 1) * self.page_size) as usize;
        let end = (start + self.page_size as usize).min(self.items.len());
        Ok(&self.items[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_cover_items_in_order() {
        let items = vec![1, 2, 3, 4, 5, 6, 7];
        let paginator = Paginator::new(&items, 3);
        assert_eq!(paginator.page_count(), 3);
        assert_eq!(paginator.get_page(1).unwrap(), &[1, 2, 3]);
        assert_eq!(paginator.get_page(2).unwrap(), &[4, 5, 6]);
        assert_eq!(paginator.get_page(3).unwrap(), &[7]);
    }

    #[test]
    fn test_exact_multiple() {
        let items = vec![1, 2, 3, 4];
        let paginator = Paginator::new(&items, 2);
        assert_eq!(paginator.page_count(), 2);
        assert_eq!(paginator.get_page(2).unwrap(), &[3, 4]);
    }

    #[test]
    fn test_out_of_range_pages() {
        let items = vec![1, 2, 3];
        let paginator = Paginator::new(&items, 2);
        assert!(paginator.get_page(0).is_err());
        assert!(paginator.get_page(3).is_err());
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::new(&items, 3);
        assert_eq!(paginator.page_count(), 0);
        assert!(paginator.get_page(1).is_err());
    }
}
