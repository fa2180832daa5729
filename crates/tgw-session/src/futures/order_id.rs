use std::fmt;
use std::str::FromStr;

use tgw_protocol::ValidationError;

/// Session-scoped futures order identity.
///
/// `front_id`/`session_id` come from the login response, `order_ref` from the
/// local counter. The string form `{front}_{session}_{ref}` is what the host
/// sees as the order id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuturesOrderId {
    pub front_id: i32,
    pub session_id: i32,
    pub order_ref: String,
}

impl FuturesOrderId {
    pub fn new(front_id: i32, session_id: i32, order_ref: impl Into<String>) -> Self {
        Self {
            front_id,
            session_id,
            order_ref: order_ref.into(),
        }
    }
}

impl fmt::Display for FuturesOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.front_id, self.session_id, self.order_ref)
    }
}

impl FromStr for FuturesOrderId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedOrderId(s.to_string());
        let mut parts = s.splitn(3, '_');
        let front_id = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(malformed)?;
        let session_id = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(malformed)?;
        let order_ref = parts
            .next()
            .filter(|p| !p.is_empty() && !p.contains('_'))
            .ok_or_else(malformed)?;
        Ok(Self::new(front_id, session_id, order_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        let id = FuturesOrderId::new(1, -128734, "42");
        let s = id.to_string();
        assert_eq!(s, "1_-128734_42");
        assert_eq!(s.parse::<FuturesOrderId>().unwrap(), id);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "1_2", "a_2_3", "1_b_3", "1_2_", "1_2_3_4"] {
            assert_eq!(
                bad.parse::<FuturesOrderId>(),
                Err(ValidationError::MalformedOrderId(bad.to_string())),
                "{bad}"
            );
        }
    }
}
