/// Command palette commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "trending",
    aliases: &["t", "home"],
    description: "Browse trending titles",
  },
  Command {
    name: "search",
    aliases: &["s", "find"],
    description: "Free-text movie search",
  },
  Command {
    name: "quiz",
    aliases: &["for-you", "picks"],
    description: "Taste quiz recommendations",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit flicks",
  },
];

/// How well a command matches typed input; lower ranks first.
fn match_rank(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    return Some(0);
  }
  if cmd.aliases.contains(&input) {
    return Some(1);
  }
  if cmd.name.starts_with(input) {
    return Some(2);
  }
  if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    return Some(3);
  }
  if cmd.name.contains(input) || cmd.aliases.iter().any(|a| a.contains(input)) {
    return Some(4);
  }
  None
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();
  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| match_rank(cmd, &input).map(|rank| (cmd, rank)))
    .collect();

  matches.sort_by_key(|(_, rank)| *rank);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match_ranks_first() {
    let suggestions = get_suggestions("trending");
    assert_eq!(suggestions[0].name, "trending");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("s");
    assert_eq!(suggestions[0].name, "search");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("qu");
    assert!(suggestions.iter().any(|c| c.name == "quiz"));
    assert!(suggestions.iter().any(|c| c.name == "quit"));
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("end");
    assert_eq!(suggestions[0].name, "trending");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
