/// Minimal single-line input editor shared by all forms. `cursor` is a byte
/// offset into `value`, always on a char boundary, so multi-byte input
/// ("José", "€12") edits cleanly.
#[derive(Default, Clone)]
pub struct LineEdit {
    pub value: String,
    pub cursor: usize,
    pub password: bool,
}

impl LineEdit {
    pub fn set(&mut self, s: impl Into<String>) {
        self.value = s.into();
        self.cursor = self.value.len();
    }

    pub fn push(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some((start, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.value.remove(start);
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if let Some((start, _)) = self.value[..self.cursor].char_indices().next_back() {
            self.cursor = start;
        }
    }

    pub fn right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn rendered(&self) -> String {
        if self.password {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_after_a_multibyte_char_inserts_at_a_boundary() {
        let mut edit = LineEdit::default();
        edit.push('é');
        edit.push('x');
        assert_eq!(edit.value, "éx");
        assert_eq!(edit.cursor, "éx".len());
    }

    #[test]
    fn backspace_removes_a_whole_multibyte_char() {
        let mut edit = LineEdit::default();
        edit.set("caf€");
        edit.backspace();
        assert_eq!(edit.value, "caf");
        assert_eq!(edit.cursor, 3);
        edit.backspace();
        assert_eq!(edit.value, "ca");
    }

    #[test]
    fn cursor_moves_char_by_char_across_multibyte_text() {
        let mut edit = LineEdit::default();
        edit.set("a€b");
        edit.left();
        edit.left();
        assert_eq!(edit.cursor, 1);
        edit.push('é');
        assert_eq!(edit.value, "aé€b");
        edit.right();
        edit.delete();
        assert_eq!(edit.value, "aé€");
    }

    #[test]
    fn edges_are_no_ops() {
        let mut edit = LineEdit::default();
        edit.backspace();
        edit.delete();
        edit.left();
        edit.right();
        assert_eq!(edit.value, "");
        assert_eq!(edit.cursor, 0);
    }

    #[test]
    fn password_mask_is_one_star_per_char() {
        let mut edit = LineEdit {
            password: true,
            ..LineEdit::default()
        };
        edit.set("s€cret");
        assert_eq!(edit.rendered(), "******");
    }
}
