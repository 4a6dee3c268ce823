//! Widget state and the reducer that drives it.

use rupeeconv_common::{ExchangeRate, RateOrigin, Unit, ValidationError};
use rupeeconv_fx::{Conversion, ConversionEngine, RateResolution};
use tracing::{debug, warn};

/// Progress of the one-time rate acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatePhase {
    /// Nothing requested yet.
    Idle,
    /// Live fetch in flight.
    Loading,
    /// A usable rate is held. Never left once entered.
    Ready(RateResolution),
}

impl RatePhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, RatePhase::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RatePhase::Ready(_))
    }
}

/// Everything the view needs, as an immutable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Amount input, unparsed.
    pub amount_text: String,
    /// Selected unit, unparsed.
    pub unit_text: String,
    /// Rate acquisition phase.
    pub rate: RatePhase,
    /// Last successful conversion.
    pub result: Option<Conversion>,
    /// Blocking notice from the last failed conversion.
    pub notice: Option<ValidationError>,
}

impl WidgetState {
    /// Initial state with `unit` preselected.
    pub fn new(unit: Unit) -> Self {
        Self {
            amount_text: String::new(),
            unit_text: unit.label().to_string(),
            rate: RatePhase::Idle,
            result: None,
            notice: None,
        }
    }

    /// Resolution once the rate is ready.
    pub fn resolution(&self) -> Option<&RateResolution> {
        match &self.rate {
            RatePhase::Ready(resolution) => Some(resolution),
            _ => None,
        }
    }

    /// Informational fallback notice, if any.
    pub fn rate_diagnostic(&self) -> Option<&str> {
        self.resolution().and_then(|r| r.diagnostic.as_deref())
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new(Unit::default())
    }
}

/// State transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AmountChanged(String),
    UnitChanged(String),
    /// Start the live fetch.
    RateRequested,
    /// Rate acquisition finished.
    RateResolved(RateResolution),
    /// The user pressed convert.
    ConvertRequested,
    /// The user acknowledged the blocking notice.
    NoticeDismissed,
}

/// Apply `action` to `state`.
///
/// `fallback` is the rate conversions use while no resolution is held.
pub fn reduce(state: &WidgetState, action: Action, fallback: &ExchangeRate) -> WidgetState {
    let mut next = state.clone();

    match action {
        Action::AmountChanged(text) => next.amount_text = text,
        Action::UnitChanged(text) => next.unit_text = text,
        Action::RateRequested => match state.rate {
            RatePhase::Idle => next.rate = RatePhase::Loading,
            _ => debug!(phase = ?state.rate, "Rate already requested, ignoring"),
        },
        Action::RateResolved(resolution) => match state.rate {
            RatePhase::Loading => next.rate = RatePhase::Ready(resolution),
            RatePhase::Idle if resolution.origin() == RateOrigin::Fixed => {
                next.rate = RatePhase::Ready(resolution)
            }
            _ => warn!(
                phase = ?state.rate,
                origin = %resolution.origin(),
                "Discarding rate resolution outside loading phase"
            ),
        },
        Action::ConvertRequested => {
            let rate = state
                .resolution()
                .map(|r| &r.rate)
                .unwrap_or(fallback);

            match ConversionEngine::new().convert(&state.amount_text, &state.unit_text, rate) {
                Ok(conversion) => {
                    next.result = Some(conversion);
                    next.notice = None;
                }
                Err(e) => {
                    debug!(code = e.error_code(), input = %state.amount_text, "Conversion rejected");
                    next.notice = Some(e);
                }
            }
        }
        Action::NoticeDismissed => next.notice = None,
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rupeeconv_common::RateQuote;
    use rust_decimal_macros::dec;

    fn live(rate: rust_decimal::Decimal) -> RateResolution {
        RateResolution::resolved(ExchangeRate::live(rate).unwrap())
    }

    fn run(state: WidgetState, actions: Vec<Action>) -> WidgetState {
        let fallback = ExchangeRate::fallback();
        actions
            .into_iter()
            .fold(state, |state, action| reduce(&state, action, &fallback))
    }

    #[test]
    fn test_initial_state() {
        let state = WidgetState::default();

        assert_eq!(state.unit_text, "lakhs");
        assert_eq!(state.rate, RatePhase::Idle);
        assert!(state.result.is_none());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_live_lifecycle() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::RateRequested,
                Action::RateResolved(live(dec!(0.012))),
                Action::AmountChanged("5".into()),
                Action::UnitChanged("lakhs".into()),
                Action::ConvertRequested,
            ],
        );

        assert!(state.rate.is_ready());
        assert_eq!(
            state.result.as_ref().map(Conversion::message).as_deref(),
            Some("5 lakhs = $6,000.00 USD")
        );
    }

    #[test]
    fn test_fallback_notice_is_not_blocking() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::RateRequested,
                Action::RateResolved(RateResolution::fallback(ExchangeRate::fallback())),
                Action::AmountChanged("1".into()),
                Action::UnitChanged("crores".into()),
                Action::ConvertRequested,
            ],
        );

        assert!(state.rate_diagnostic().is_some());
        assert!(state.notice.is_none());
        let conversion = state.result.unwrap();
        assert_eq!(conversion.rate.origin(), RateOrigin::Fallback);
        assert_eq!(conversion.message(), "1 crores = $121,951.22 USD");
    }

    #[test]
    fn test_loading_is_entered_once() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::RateRequested,
                Action::RateResolved(live(dec!(0.012))),
                Action::RateRequested,
                Action::RateResolved(live(dec!(0.5))),
            ],
        );

        let rate = &state.resolution().unwrap().rate;
        assert_eq!(rate.quote(), RateQuote::UsdPerInr(dec!(0.012)));
    }

    #[test]
    fn test_resolution_without_request_is_discarded() {
        let state = run(
            WidgetState::default(),
            vec![Action::RateResolved(live(dec!(0.012)))],
        );

        assert_eq!(state.rate, RatePhase::Idle);
    }

    #[test]
    fn test_fixed_rate_skips_loading() {
        let state = run(
            WidgetState::default(),
            vec![Action::RateResolved(RateResolution::resolved(ExchangeRate::fixed()))],
        );

        assert_eq!(state.resolution().unwrap().origin(), RateOrigin::Fixed);
    }

    #[test]
    fn test_convert_before_rate_uses_fallback() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::RateRequested,
                Action::AmountChanged("1".into()),
                Action::UnitChanged("crores".into()),
                Action::ConvertRequested,
            ],
        );

        assert!(state.rate.is_loading());
        let conversion = state.result.unwrap();
        assert_eq!(conversion.rate.origin(), RateOrigin::Fallback);
        assert_eq!(conversion.usd, dec!(121951.22));
    }

    #[test]
    fn test_validation_error_keeps_previous_result() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::AmountChanged("2".into()),
                Action::ConvertRequested,
                Action::AmountChanged("-4".into()),
                Action::ConvertRequested,
            ],
        );

        assert_eq!(state.notice, Some(ValidationError::invalid_amount("-4")));
        assert_eq!(state.result.unwrap().amount.to_string(), "2");
    }

    #[test]
    fn test_unknown_unit_sets_notice() {
        let state = run(
            WidgetState::default(),
            vec![
                Action::AmountChanged("2".into()),
                Action::UnitChanged("millions".into()),
                Action::ConvertRequested,
            ],
        );

        assert_eq!(state.notice, Some(ValidationError::UnknownUnit("millions".into())));
        assert!(state.result.is_none());
    }

    #[test]
    fn test_success_and_dismiss_clear_notice() {
        let failed = run(
            WidgetState::default(),
            vec![Action::AmountChanged("abc".into()), Action::ConvertRequested],
        );
        assert!(failed.notice.is_some());

        let dismissed = run(failed.clone(), vec![Action::NoticeDismissed]);
        assert!(dismissed.notice.is_none());

        let converted = run(
            failed,
            vec![Action::AmountChanged("3".into()), Action::ConvertRequested],
        );
        assert!(converted.notice.is_none());
        assert!(converted.result.is_some());
    }
}
