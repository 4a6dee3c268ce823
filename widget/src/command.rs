//! Interactive prompt commands.

use crate::state::Action;

pub const HELP: &str = "\
Commands:
  amount <value>      set the amount
  unit <unit>         set the unit (rupees, lakhs, crores)
  convert             convert to USD
  <value> [unit]      set amount (and unit) and convert
  dismiss             clear the notice
  show                redraw the widget
  help                show this help
  quit                exit";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply actions in order.
    Apply(Vec<Action>),
    Show,
    Help,
    Quit,
}

/// Parse a line of input.
pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Command::Show;
    };
    let rest: Vec<&str> = words.collect();

    match (first.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("quit" | "exit" | "q", []) => Command::Quit,
        ("help" | "?", []) => Command::Help,
        ("show", []) => Command::Show,
        ("dismiss", []) => Command::Apply(vec![Action::NoticeDismissed]),
        ("convert", []) => Command::Apply(vec![Action::ConvertRequested]),
        ("amount", [value]) => Command::Apply(vec![Action::AmountChanged(value.to_string())]),
        ("unit", [unit]) => Command::Apply(vec![Action::UnitChanged(unit.to_string())]),
        (_, []) => Command::Apply(vec![
            Action::AmountChanged(first.to_string()),
            Action::ConvertRequested,
        ]),
        (_, [unit]) => Command::Apply(vec![
            Action::AmountChanged(first.to_string()),
            Action::UnitChanged(unit.to_string()),
            Action::ConvertRequested,
        ]),
        _ => Command::Help,
    }
}
