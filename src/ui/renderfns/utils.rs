use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

/// Render a 0-10 rating as a five-star string, half-point aware,
/// e.g. 7.0 -> "***- "
pub fn rating_stars(rating: f64) -> String {
  let halves = (rating.clamp(0.0, 10.0)).round() as u32; // 0..=10 half-stars
  let full = halves / 2;
  let half = halves % 2;
  let mut stars = String::new();
  for _ in 0..full {
    stars.push('*');
  }
  if half == 1 {
    stars.push('-');
  }
  for _ in 0..(5 - full - half) {
    stars.push(' ');
  }
  stars
}

/// Display color for a 0-10 rating
pub fn rating_color(rating: f64) -> Color {
  if rating >= 7.0 {
    Color::Green
  } else if rating >= 5.0 {
    Color::Yellow
  } else {
    Color::Red
  }
}
