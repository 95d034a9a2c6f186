//! Derived pagination metadata for the rendering layer.

/// What a pagination control needs to draw itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Zero-based current page.
    pub page: usize,
    pub rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
    /// Total matching rows, `None` when unknown.
    pub total_count: Option<usize>,
    /// Whether the control should be shown at all.
    pub visible: bool,
    pub can_go_first: bool,
    pub can_go_back: bool,
    pub can_go_next: bool,
}

impl PaginationView {
    /// One-based first and last row numbers of the current page.
    pub fn displayed_rows(&self) -> (usize, usize) {
        if self.total_count == Some(0) {
            return (0, 0);
        }
        let from = self
            .page
            .saturating_mul(self.rows_per_page)
            .saturating_add(1);
        let to = self
            .page
            .saturating_add(1)
            .saturating_mul(self.rows_per_page);
        match self.total_count {
            Some(count) => (from, to.min(count)),
            None => (from, to),
        }
    }

    /// Row range label, e.g. `"11-20 of 42"` or `"1-10 of Many"`.
    pub fn label(&self) -> String {
        let (from, to) = self.displayed_rows();
        match self.total_count {
            Some(count) => format!("{}-{} of {}", from, to, count),
            None => format!("{}-{} of Many", from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(page: usize, total_count: Option<usize>) -> PaginationView {
        PaginationView {
            page,
            rows_per_page: 10,
            rows_per_page_options: vec![10, 25],
            total_count,
            visible: true,
            can_go_first: page > 0,
            can_go_back: page > 0,
            can_go_next: true,
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(view(0, Some(42)).label(), "1-10 of 42");
        assert_eq!(view(4, Some(42)).label(), "41-42 of 42");
        assert_eq!(view(1, None).label(), "11-20 of Many");
        assert_eq!(view(0, Some(0)).label(), "0-0 of 0");
    }

    #[test]
    fn test_huge_page_size_saturates() {
        let mut huge = view(1, None);
        huge.rows_per_page = usize::MAX / 2 + 1;
        assert_eq!(huge.displayed_rows(), (usize::MAX / 2 + 2, usize::MAX));
        assert_eq!(huge.label(), format!("{}-{} of Many", usize::MAX / 2 + 2, usize::MAX));

        let mut counted = view(1, Some(7));
        counted.rows_per_page = usize::MAX;
        assert_eq!(counted.displayed_rows(), (usize::MAX, 7));
    }
}
