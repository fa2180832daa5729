use tgw_protocol::futures::{FuturesCallback, FuturesRequest};
use tgw_protocol::options::{OptionsCallback, OptionsRequest};
use tgw_protocol::{NativeApi, ValidationError};
use tgw_schemas::{CancelRequest, ConnectSettings, ExerciseRequest, OrderRequest};
use tgw_session::{FuturesSession, OptionsSession};

/// Capability surface the gateway needs from a trading session.
///
/// Exercise operations only exist on the stock-option session; the
/// defaults log and do nothing.
pub trait TradingSession {
    type Callback;

    fn gateway_name(&self) -> &str;
    fn connect(&mut self, address: &str, settings: &ConnectSettings);
    fn handle(&mut self, callback: Self::Callback);
    fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError>;
    fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError>;
    fn query_account(&mut self);
    fn query_position(&mut self);
    fn close(&mut self);

    /// Host timer tick.
    fn on_timer(&mut self) {}

    fn send_exercise(&mut self, _req: &ExerciseRequest) {
        tracing::warn!(gateway = %self.gateway_name(), "exercise is not supported by this session");
    }

    fn cancel_exercise(&mut self, _req: &CancelRequest) {
        tracing::warn!(gateway = %self.gateway_name(), "exercise is not supported by this session");
    }

    fn query_exercise(&mut self) {
        tracing::warn!(gateway = %self.gateway_name(), "exercise is not supported by this session");
    }
}

impl<A: NativeApi<FuturesRequest>> TradingSession for FuturesSession<A> {
    type Callback = FuturesCallback;

    fn gateway_name(&self) -> &str {
        FuturesSession::gateway_name(self)
    }

    fn connect(&mut self, address: &str, settings: &ConnectSettings) {
        FuturesSession::connect(self, address, settings)
    }

    fn handle(&mut self, callback: FuturesCallback) {
        FuturesSession::handle(self, callback)
    }

    fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError> {
        FuturesSession::send_order(self, req)
    }

    fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError> {
        FuturesSession::cancel_order(self, req)
    }

    fn query_account(&mut self) {
        FuturesSession::query_account(self)
    }

    fn query_position(&mut self) {
        FuturesSession::query_position(self)
    }

    fn close(&mut self) {
        FuturesSession::close(self)
    }
}

impl<A: NativeApi<OptionsRequest>> TradingSession for OptionsSession<A> {
    type Callback = OptionsCallback;

    fn gateway_name(&self) -> &str {
        OptionsSession::gateway_name(self)
    }

    fn connect(&mut self, address: &str, settings: &ConnectSettings) {
        OptionsSession::connect(self, address, settings)
    }

    fn handle(&mut self, callback: OptionsCallback) {
        OptionsSession::handle(self, callback)
    }

    fn send_order(&mut self, req: &OrderRequest) -> Result<String, ValidationError> {
        OptionsSession::send_order(self, req)
    }

    fn cancel_order(&mut self, req: &CancelRequest) -> Result<(), ValidationError> {
        OptionsSession::cancel_order(self, req)
    }

    fn query_account(&mut self) {
        OptionsSession::query_account(self)
    }

    fn query_position(&mut self) {
        OptionsSession::query_position(self)
    }

    fn close(&mut self) {
        OptionsSession::close(self)
    }

    fn on_timer(&mut self) {
        OptionsSession::on_timer(self)
    }

    fn send_exercise(&mut self, req: &ExerciseRequest) {
        OptionsSession::send_exercise(self, req)
    }

    fn cancel_exercise(&mut self, req: &CancelRequest) {
        OptionsSession::cancel_exercise(self, req)
    }

    fn query_exercise(&mut self) {
        OptionsSession::query_exercise(self)
    }
}
