mod errors;
mod payment_gateway;
mod policy;

pub use errors::GatewayError;
pub use payment_gateway::PaymentGateway;
pub use policy::RiskPolicy;
