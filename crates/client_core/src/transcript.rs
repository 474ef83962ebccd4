//! Append-only, order-preserving log of conversation turns.

use shared::domain::Turn;

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::Role;

    use super::*;

    #[test]
    fn starts_empty() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert!(transcript.all().is_empty());
        assert!(transcript.last().is_none());
    }

    #[test]
    fn append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Turn::user("first"));
        transcript.append(Turn::assistant("second"));
        transcript.append(Turn::user("third"));

        let contents: Vec<_> = transcript.iter().map(Turn::content).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.last().map(Turn::role), Some(Role::User));
    }
}
