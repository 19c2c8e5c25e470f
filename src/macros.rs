/// Builds a [`MapBean`](crate::MapBean) from `name => value` pairs.
///
/// Values are converted with `Into<Value>`, so literals, strings, nested
/// map beans and [`Value`](crate::Value)s can be mixed freely.
///
/// # Examples
///
/// ```rust
/// use beanxml::{map_bean, Value};
///
/// let bean = map_bean! {
///     "element" => "Test",
///     "count" => 3,
///     "child" => map_bean! {},
/// };
/// assert_eq!(bean.len(), 3);
/// assert_eq!(bean.get("count"), Some(&Value::Int(3)));
/// ```
#[macro_export]
macro_rules! map_bean {
    () => {
        $crate::MapBean::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut bean = $crate::MapBean::new();
        $(
            bean.insert($key, $value);
        )+
        bean
    }};
}

#[cfg(test)]
mod tests {
    use crate::{MapBean, Value};

    #[test]
    fn test_map_bean_macro_empty() {
        assert_eq!(map_bean! {}, MapBean::new());
    }

    #[test]
    fn test_map_bean_macro_entries() {
        let bean = map_bean! {
            "name" => "Alice",
            "age" => 30,
            "nothing" => Value::Null,
        };
        assert_eq!(bean.len(), 3);
        assert_eq!(bean.get("name"), Some(&Value::String("Alice".to_string())));
        let keys: Vec<_> = bean.keys().cloned().collect();
        assert_eq!(keys, vec!["name", "age", "nothing"]);
    }

    #[test]
    fn test_map_bean_macro_nested() {
        let bean = map_bean! { "inner" => map_bean! { "x" => true } };
        match bean.get("inner") {
            Some(Value::Bean(inner)) => assert_eq!(inner.type_name(), MapBean::META_NAME),
            other => panic!("Expected bean, found {:?}", other),
        }
    }
}
