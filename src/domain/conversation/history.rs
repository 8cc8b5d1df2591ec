//! Conversation history lines and the context window built from them.

/// Separator between history lines in the classifier context.
pub const CONTEXT_SEPARATOR: &str = " | ";

pub fn user_line(text: &str) -> String {
    format!("Usuario: {}", text.trim())
}

pub fn bot_line(text: &str) -> String {
    format!("Bot: {}", text.trim())
}

/// Joins the most recent lines, oldest first, into one context string.
pub fn context(lines: &[String], window: usize) -> String {
    let start = lines.len().saturating_sub(window);
    lines[start..].join(CONTEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_prefixed_by_speaker() {
        assert_eq!(user_line(" hola "), "Usuario: hola");
        assert_eq!(bot_line("¿Eres Ana?"), "Bot: ¿Eres Ana?");
    }

    #[test]
    fn context_keeps_only_the_window() {
        let lines: Vec<String> = (1..=7).map(|i| format!("l{}", i)).collect();
        assert_eq!(context(&lines, 5), "l3 | l4 | l5 | l6 | l7");
    }

    #[test]
    fn context_of_short_history_uses_everything() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(context(&lines, 5), "a | b");
        assert_eq!(context(&[], 5), "");
    }
}
