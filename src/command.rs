use stow_core::SectionName;

/// A line read from the control channel (stdin).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Left click on the control item of a section.
    Click(SectionName),
    /// Option-click on the "Hidden" control item.
    OptionClick,
    /// Right click on the control item of a section; pops up its menu.
    RightClick(SectionName),
    /// Select the entry at an index of the last menu shown.
    Menu(usize),
    /// Drag a section's control item to an offset from the trailing edge.
    Drag(SectionName, f64),
    /// Enable or disable the "Always Hidden" section.
    AlwaysHidden(bool),
    Status,
    Save,
    Quit,
    /// Anything we can't parse. Carries the raw line for the log.
    Unknown(String),
}

/// Parse a section argument: `hidden`, `always-hidden` or `always-visible`.
pub fn parse_section(raw: &str) -> Option<SectionName> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "hidden" | "h" => Some(SectionName::Hidden),
        "always-hidden" | "ah" => Some(SectionName::AlwaysHidden),
        "always-visible" | "av" => Some(SectionName::AlwaysVisible),
        _ => None,
    }
}

/// Parse a raw command line into a typed [`Command`].
///
/// Commands have the format `verb [args...]`, separated by whitespace.
pub fn parse_command(line: &str) -> Command {
    let unknown = || Command::Unknown(line.trim().to_string());
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return unknown();
    };
    let args: Vec<&str> = words.collect();

    match (verb, args.as_slice()) {
        ("click", [section]) => parse_section(section).map(Command::Click).unwrap_or_else(unknown),
        ("option-click", []) => Command::OptionClick,
        ("right-click", [section]) => parse_section(section)
            .map(Command::RightClick)
            .unwrap_or_else(unknown),
        ("menu", [index]) => index.parse().map(Command::Menu).unwrap_or_else(|_| unknown()),
        ("drag", [section, offset]) => match (parse_section(section), offset.parse::<f64>()) {
            (Some(section), Ok(offset)) if offset.is_finite() => Command::Drag(section, offset),
            _ => unknown(),
        },
        ("enable", ["always-hidden"]) => Command::AlwaysHidden(true),
        ("disable", ["always-hidden"]) => Command::AlwaysHidden(false),
        ("status", []) => Command::Status,
        ("save", []) => Command::Save,
        ("quit" | "exit", []) => Command::Quit,
        _ => unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_click_commands() {
        assert_eq!(parse_command("click hidden"), Command::Click(SectionName::Hidden));
        assert_eq!(
            parse_command("right-click always-visible"),
            Command::RightClick(SectionName::AlwaysVisible)
        );
        assert_eq!(parse_command("  option-click "), Command::OptionClick);
    }

    #[test]
    fn parse_drag_and_menu() {
        assert_eq!(
            parse_command("drag ah 120.5"),
            Command::Drag(SectionName::AlwaysHidden, 120.5)
        );
        assert_eq!(parse_command("menu 3"), Command::Menu(3));
    }

    #[test]
    fn parse_toggles_always_hidden() {
        assert_eq!(parse_command("enable always-hidden"), Command::AlwaysHidden(true));
        assert_eq!(parse_command("disable always-hidden"), Command::AlwaysHidden(false));
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(parse_command("click nowhere"), Command::Unknown(_)));
        assert!(matches!(parse_command("drag hidden NaN"), Command::Unknown(_)));
        assert!(matches!(parse_command("menu -1"), Command::Unknown(_)));
        assert!(matches!(parse_command(""), Command::Unknown(_)));
    }
}
