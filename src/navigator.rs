//! Drill-down stack for following schema references

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorView {
    Base,
    DrillDown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry<T> {
    pub subtree: T,
    pub label: String,
}

/// LIFO stack of visited subtrees. An empty stack is the base view.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNavigator<T> {
    stack: Vec<NavEntry<T>>,
}

impl<T> Default for TypeNavigator<T> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<T> TypeNavigator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subtree: T, label: impl Into<String>) {
        self.stack.push(NavEntry {
            subtree,
            label: label.into(),
        });
    }

    /// Remove the tail entry; does nothing on an empty stack
    pub fn pop(&mut self) -> Option<NavEntry<T>> {
        self.stack.pop()
    }

    pub fn reset(&mut self) {
        self.stack.clear();
    }

    pub fn current(&self) -> Option<&T> {
        self.stack.last().map(|entry| &entry.subtree)
    }

    pub fn current_label(&self) -> Option<&str> {
        self.stack.last().map(|entry| entry.label.as_str())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn view(&self) -> NavigatorView {
        if self.stack.is_empty() {
            NavigatorView::Base
        } else {
            NavigatorView::DrillDown
        }
    }

    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.stack.iter().map(|entry| entry.label.as_str()).collect()
    }

    /// Breadcrumbs joined for a single status line
    pub fn breadcrumb_line(&self, separator: &str) -> String {
        self.breadcrumbs().join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_base_view() {
        let nav: TypeNavigator<u32> = TypeNavigator::new();
        assert_eq!(nav.view(), NavigatorView::Base);
        assert!(nav.current().is_none());
        assert!(nav.breadcrumbs().is_empty());
    }

    #[test]
    fn test_push_then_pop_restores_previous_state() {
        let mut nav = TypeNavigator::new();
        nav.push(1, "Pet");
        let crumbs: Vec<String> = nav.breadcrumbs().iter().map(|s| s.to_string()).collect();
        let view = nav.view();

        nav.push(2, "Category");
        assert_eq!(nav.current(), Some(&2));
        assert_eq!(nav.breadcrumb_line(" > "), "Pet > Category");

        nav.pop();
        assert_eq!(nav.breadcrumbs(), crumbs);
        assert_eq!(nav.view(), view);
        assert_eq!(nav.current_label(), Some("Pet"));

        nav.pop();
        assert_eq!(nav.view(), NavigatorView::Base);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut nav: TypeNavigator<u32> = TypeNavigator::new();
        assert!(nav.pop().is_none());
        assert_eq!(nav, TypeNavigator::new());
    }

    #[test]
    fn test_reset_always_returns_to_base() {
        let mut nav = TypeNavigator::new();
        for depth in 0..5 {
            for i in 0..depth {
                nav.push(i, format!("level{i}"));
            }
            nav.reset();
            assert_eq!(nav.view(), NavigatorView::Base);
            assert_eq!(nav.depth(), 0);
        }
    }

    #[test]
    fn test_push_pop_sequences_track_depth() {
        let mut nav = TypeNavigator::new();
        let mut expected = 0usize;
        for step in 0..40u32 {
            if step % 3 == 2 {
                nav.pop();
                expected = expected.saturating_sub(1);
            } else {
                nav.push(step, step.to_string());
                expected += 1;
            }
            assert_eq!(nav.depth(), expected);
            assert_eq!(nav.breadcrumbs().len(), expected);
        }
    }
}
