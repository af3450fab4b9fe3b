//! Star-rating control state, independent of any widget toolkit.

/// Interaction state of a star-rating control.
///
/// A hover previews a value without committing it; leaving the control
/// falls back to the committed rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarRating {
    max: u8,
    rating: u8,
    hover: Option<u8>,
    messages: Vec<String>,
}

impl StarRating {
    pub fn new(max: u8, default_rating: u8) -> Self {
        let max = max.max(1);
        Self {
            max,
            rating: default_rating.min(max),
            hover: None,
            messages: Vec::new(),
        }
    }

    /// One label per star, shown instead of the number when complete.
    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Commit a rating. Returns the clamped value.
    pub fn click(&mut self, star: u8) -> u8 {
        self.rating = star.clamp(1, self.max);
        self.hover = None;
        self.rating
    }

    pub fn hover(&mut self, star: u8) {
        self.hover = Some(star.clamp(1, self.max));
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Re-seed from a changed default (e.g. another title was opened).
    pub fn reset_to(&mut self, default_rating: u8) {
        self.rating = default_rating.min(self.max);
        self.hover = None;
    }

    /// Value the stars should currently show as filled.
    pub fn displayed(&self) -> u8 {
        self.hover.unwrap_or(self.rating)
    }

    pub fn is_filled(&self, star: u8) -> bool {
        star <= self.displayed()
    }

    /// Text next to the stars: the per-star message if one exists,
    /// otherwise the number, or nothing for 0.
    pub fn label(&self) -> String {
        let shown = self.displayed();
        if shown == 0 {
            return String::new();
        }
        if self.messages.len() == usize::from(self.max) {
            return self.messages[usize::from(shown) - 1].clone();
        }
        shown.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_previews_without_commit() {
        let mut stars = StarRating::new(10, 0);
        stars.hover(7);
        assert_eq!(stars.displayed(), 7);
        assert_eq!(stars.rating(), 0);

        stars.leave();
        assert_eq!(stars.displayed(), 0);
        assert_eq!(stars.label(), "");
    }

    #[test]
    fn test_click_commits_and_clamps() {
        let mut stars = StarRating::new(10, 0);
        assert_eq!(stars.click(8), 8);
        assert!(stars.is_filled(8));
        assert!(!stars.is_filled(9));

        assert_eq!(stars.click(42), 10);
        assert_eq!(stars.click(0), 1);
    }

    #[test]
    fn test_default_and_reset() {
        let mut stars = StarRating::new(5, 9);
        assert_eq!(stars.rating(), 5);
        stars.hover(2);
        stars.reset_to(3);
        assert_eq!(stars.displayed(), 3);
    }

    #[test]
    fn test_message_labels() {
        let stars = StarRating::new(3, 2).with_messages(vec![
            "Bad".into(),
            "Okay".into(),
            "Great".into(),
        ]);
        assert_eq!(stars.label(), "Okay");

        let plain = StarRating::new(10, 4);
        assert_eq!(plain.label(), "4");
    }
}
