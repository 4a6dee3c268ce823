//! Widget controller: owns the state cell and the rate provider.

use std::sync::Arc;

use parking_lot::RwLock;
use rupeeconv_fx::{
    ExchangeRateApiProvider, FallbackRateProvider, FixedRateProvider, FxResult, RateProvider,
    RateStrategy,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::config::WidgetConfig;
use crate::state::{reduce, Action, RatePhase, WidgetState};

/// The converter widget.
pub struct Converter {
    /// Rate acquisition with fallback.
    provider: FallbackRateProvider,
    /// The single mutable cell.
    state: RwLock<WidgetState>,
}

impl Converter {
    /// Create a converter around `provider`.
    pub fn new(provider: Arc<dyn RateProvider>, initial: WidgetState) -> Self {
        Self {
            provider: FallbackRateProvider::new(provider),
            state: RwLock::new(initial),
        }
    }

    /// Build the provider selected by `config.strategy`.
    pub fn from_config(config: &WidgetConfig) -> FxResult<Self> {
        let provider: Arc<dyn RateProvider> = match config.strategy {
            RateStrategy::Live => Arc::new(ExchangeRateApiProvider::new(config.api_config())?),
            RateStrategy::Fixed => Arc::new(FixedRateProvider::new()),
        };

        info!(
            strategy = %config.strategy,
            provider = provider.name(),
            "Converter configured"
        );

        Ok(Self::new(provider, WidgetState::new(config.default_unit)))
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WidgetState {
        self.state.read().clone()
    }

    /// Whether the rate is fetched over the network.
    pub fn is_live(&self) -> bool {
        self.provider.is_live()
    }

    /// Apply an action and return the new state.
    pub fn dispatch(&self, action: Action) -> WidgetState {
        let fallback = self.provider.fallback_rate();
        let mut state = self.state.write();
        let next = reduce(&state, action, &fallback);
        *state = next.clone();
        next
    }

    /// Acquire the rate once.
    ///
    /// Only the first call does any work. If the returned future is dropped
    /// before completion the rate stays unresolved and conversions keep using
    /// the fallback rate.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn mount(&self) {
        if self.provider.is_live() {
            let started = {
                let mut state = self.state.write();
                if state.rate != RatePhase::Idle {
                    false
                } else {
                    let next = reduce(&state, Action::RateRequested, &self.provider.fallback_rate());
                    *state = next;
                    true
                }
            };

            if !started {
                debug!("Rate already requested");
                return;
            }
        } else if self.state.read().rate != RatePhase::Idle {
            debug!("Rate already set");
            return;
        }

        let resolution = self.provider.fetch_rate().await;
        self.dispatch(Action::RateResolved(resolution));
    }

    /// Run `mount` on the tokio runtime without blocking the caller.
    pub fn spawn_mount(self: &Arc<Self>) -> JoinHandle<()> {
        let converter = Arc::clone(self);
        tokio::spawn(async move { converter.mount().await })
    }
}
