//! Predefined questions offered as one-click shortcuts.
//!
//! Suggestions are numbered globally from 1 across all groups, in group order,
//! so a front-end can address any of them with a single number.

use shared::domain::{Suggestion, SuggestionGroup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCatalog {
    groups: Vec<SuggestionGroup>,
}

impl Default for SuggestionCatalog {
    fn default() -> Self {
        Self::new(vec![
            SuggestionGroup::new(
                "general",
                "General Questions",
                &[
                    "Summarize my health data",
                    "What actions can I take to improve my health?",
                ],
            ),
            SuggestionGroup::new(
                "specific",
                "More Specific Questions",
                &[
                    "I feel stressed. What should I do?",
                    "Is my blood pressure within normal range?",
                    "Are there any risk factors for cardiovascular disease or diabetes?",
                    "How can I improve my sleep quality?",
                ],
            ),
        ])
    }
}

impl SuggestionCatalog {
    pub fn new(groups: Vec<SuggestionGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[SuggestionGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every suggestion with its 1-based number and owning group.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &SuggestionGroup, &Suggestion)> {
        self.groups
            .iter()
            .flat_map(|group| group.questions.iter().map(move |question| (group, question)))
            .enumerate()
            .map(|(idx, (group, question))| (idx + 1, group, question))
    }

    pub fn get(&self, number: usize) -> Option<&Suggestion> {
        self.numbered()
            .find(|(n, _, _)| *n == number)
            .map(|(_, _, suggestion)| suggestion)
    }
}
