use serde_json::Value;
use url::form_urlencoded::Serializer;

use crate::messenger::types::JsonObject;
use crate::{ApiMessengerError, Result};

/// 将参数编码为 application/x-www-form-urlencoded 查询串
///
/// - 键按插入顺序输出，空格编码为 `+`
/// - 嵌套数组/对象展开为 `key[0]=v`、`key[sub]=v`
/// - 布尔值编码为 `1` / `0`，null 被忽略
pub fn build_query(args: &JsonObject) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in args {
        append_value(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append_value(serializer: &mut Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            serializer.append_pair(key, if *b { "1" } else { "0" });
        }
        Value::Number(n) => {
            serializer.append_pair(key, &n.to_string());
        }
        Value::String(s) => {
            serializer.append_pair(key, s);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append_value(serializer, &format!("{}[{}]", key, index), item);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                append_value(serializer, &format!("{}[{}]", key, sub), item);
            }
        }
    }
}

/// 把 GET 参数转换为对象；列表按下标作为键
pub(crate) fn to_query_args(args: &Value) -> Result<JsonObject> {
    match args {
        Value::Null => Ok(JsonObject::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item.clone()))
            .collect()),
        other => Err(ApiMessengerError::InvalidArgs(format!(
            "GET arguments must be an object or a list, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let args = object(json!({"z": "1", "a": "2", "m": "3"}));
        assert_eq!(build_query(&args), "z=1&a=2&m=3");
    }

    #[test]
    fn test_form_encoding() {
        let args = object(json!({"text": "hello world", "sym": "a&b=c"}));
        assert_eq!(build_query(&args), "text=hello+world&sym=a%26b%3Dc");
    }

    #[test]
    fn test_scalar_values() {
        let args = object(json!({"new": 1, "flag": true, "off": false, "skip": null}));
        assert_eq!(build_query(&args), "new=1&flag=1&off=0");
    }

    #[test]
    fn test_nested_values() {
        let args = object(json!({"ids": [5, 6], "f": {"k": "v"}}));
        assert_eq!(
            build_query(&args),
            "ids%5B0%5D=5&ids%5B1%5D=6&f%5Bk%5D=v"
        );
    }

    #[test]
    fn test_to_query_args_from_list() {
        let args = to_query_args(&json!(["a", "b"])).unwrap();
        assert_eq!(build_query(&args), "0=a&1=b");
    }

    #[test]
    fn test_to_query_args_rejects_scalar() {
        assert!(to_query_args(&json!("x")).is_err());
        assert!(to_query_args(&Value::Null).unwrap().is_empty());
    }
}
