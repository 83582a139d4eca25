use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a quantity or amount from whatever the host sends.
/// Numbers and numeric strings parse normally; null, absent or garbage
/// values coerce to zero instead of failing the whole document.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_decimal(value.as_ref()))
}

pub(crate) fn coerce_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => n.to_string().parse().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_decimal")]
        qty: Decimal,
    }

    #[test]
    fn numbers_and_numeric_strings_parse() {
        let row: Row = serde_json::from_value(json!({"qty": 2.5})).unwrap();
        assert_eq!(row.qty, dec!(2.5));
        let row: Row = serde_json::from_value(json!({"qty": " 3 "})).unwrap();
        assert_eq!(row.qty, dec!(3));
    }

    #[test]
    fn garbage_coerces_to_zero() {
        for value in [json!({"qty": "n/a"}), json!({"qty": null}), json!({})] {
            let row: Row = serde_json::from_value(value).unwrap();
            assert_eq!(row.qty, Decimal::ZERO);
        }
    }
}
