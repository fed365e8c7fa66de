//! Button payload codec. Every inline button carries a `tag:id` pair that is
//! decoded and validated here before anything downstream trusts it.

use crate::catalog::Tier;

/// Delimiter between the tag and the id. Ids are numeric, so the delimiter
/// can never occur inside one.
const DELIMITER: char = ':';

const REQUEST_TAG: &str = "request";

/// A decoded button tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPayload {
    /// The user picked the entry `id` out of a tier menu
    Select { tier: Tier, id: i64 },
    /// The user tapped "request this item" on a detail view
    RequestItem { item_id: i64 },
}

impl CallbackPayload {
    pub fn select(tier: Tier, id: i64) -> Self {
        CallbackPayload::Select { tier, id }
    }

    /// Encode for use as inline button callback data
    pub fn encode(&self) -> String {
        match self {
            CallbackPayload::Select { tier, id } => format!("{}{}{}", tier.tag(), DELIMITER, id),
            CallbackPayload::RequestItem { item_id } => {
                format!("{}{}{}", REQUEST_TAG, DELIMITER, item_id)
            }
        }
    }

    /// Decode callback data. Anything that does not parse cleanly is
    /// rejected here rather than reaching the engines.
    pub fn decode(data: &str) -> Option<Self> {
        let (tag, id) = data.split_once(DELIMITER)?;
        let id: i64 = id.parse().ok()?;

        if tag == REQUEST_TAG {
            return Some(CallbackPayload::RequestItem { item_id: id });
        }
        Tier::from_tag(tag).map(|tier| CallbackPayload::Select { tier, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_round_trip() {
        for tier in [
            Tier::Category,
            Tier::Subcategory,
            Tier::Brand,
            Tier::Model,
            Tier::Item,
        ] {
            let payload = CallbackPayload::select(tier, 42);
            assert_eq!(CallbackPayload::decode(&payload.encode()), Some(payload));
        }
    }

    #[test]
    fn test_request_item_round_trip() {
        let payload = CallbackPayload::RequestItem { item_id: 7 };
        assert_eq!(payload.encode(), "request:7");
        assert_eq!(CallbackPayload::decode("request:7"), Some(payload));
    }

    #[test]
    fn test_encoding_shape() {
        assert_eq!(CallbackPayload::select(Tier::Category, 5).encode(), "category:5");
        assert_eq!(CallbackPayload::select(Tier::Item, 42).encode(), "item:42");
    }

    #[test]
    fn test_rejects_malformed_data() {
        assert_eq!(CallbackPayload::decode(""), None);
        assert_eq!(CallbackPayload::decode("category"), None);
        assert_eq!(CallbackPayload::decode("category:"), None);
        assert_eq!(CallbackPayload::decode("category:abc"), None);
        assert_eq!(CallbackPayload::decode("warehouse:5"), None);
        assert_eq!(CallbackPayload::decode(":5"), None);
    }

    #[test]
    fn test_negative_ids_survive() {
        let payload = CallbackPayload::select(Tier::Model, -3);
        assert_eq!(CallbackPayload::decode(&payload.encode()), Some(payload));
    }
}
