mod gateways;
pub use self::gateways::*;

mod httproutes;
pub use self::httproutes::*;
