//! 字段规则（Schema）
//!
//! 一个种类的 `Schema` 描述实例上有哪些字段以及每个字段如何从原生事件归一化：
//! - `Copy`：复制原生事件的同名字段；字段名为 `target` 时取原生事件目标；
//! - `Compute`：由原生事件计算得到；
//! - `Constant`：固定值。
//!
//! 派生种类的 `Schema` 由父 `Schema` 与子片段浅合并得到（同名字段子覆盖父），
//! 合并在定义期完成一次，之后不可变。
//!
use crate::native_event::NativeEvent;
use serde_json::Value;
use std::{collections::HashMap, fmt, rc::Rc};

/// 取原生事件目标而非同名字段的字段名
pub const TARGET_FIELD: &str = "target";

/// 由原生事件计算字段值的函数
pub type ComputeFn = Rc<dyn Fn(&dyn NativeEvent) -> Value>;

/// 单个字段的归一化规则
#[derive(Clone)]
pub enum FieldRule {
    Copy,
    Compute(ComputeFn),
    Constant(Value),
}

impl FieldRule {
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&dyn NativeEvent) -> Value + 'static,
    {
        Self::Compute(Rc::new(f))
    }

    pub(crate) fn normalize(&self, name: &str, native: &dyn NativeEvent, raw_target: &Value) -> Value {
        match self {
            FieldRule::Copy if name == TARGET_FIELD => raw_target.clone(),
            FieldRule::Copy => native.field(name).unwrap_or(Value::Null),
            FieldRule::Compute(f) => f(native),
            FieldRule::Constant(value) => value.clone(),
        }
    }
}

/// 未指定计算函数即按名复制，不继承父规则
impl From<Option<ComputeFn>> for FieldRule {
    fn from(value: Option<ComputeFn>) -> Self {
        match value {
            Some(f) => FieldRule::Compute(f),
            None => FieldRule::Copy,
        }
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Copy => f.write_str("Copy"),
            FieldRule::Compute(_) => f.write_str("Compute(..)"),
            FieldRule::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
        }
    }
}

/// 有序的字段规则集合；字段顺序即定义顺序，覆盖时保留原位置
#[derive(Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 字段在实例存储中的下标
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// 以 `self` 为父、`fragment` 为子合并出新的 `Schema`
    pub fn merged(&self, fragment: &Schema) -> Schema {
        let mut merged = self.clone();
        for (name, rule) in fragment.iter() {
            merged.insert(name.to_string(), rule.clone());
        }
        merged
    }

    fn insert(&mut self, name: String, rule: FieldRule) {
        match self.index.get(&name) {
            Some(&i) => self.fields[i].1 = rule,
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, rule));
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(name, rule)| (name, rule)))
            .finish()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldRule)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldRule)>>(iter: I) -> Self {
        let mut schema = Schema::default();
        for (name, rule) in iter {
            schema.insert(name.into(), rule);
        }
        schema
    }
}

/// `Schema` 的链式构建器
#[derive(Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn copy(self, name: impl Into<String>) -> Self {
        self.rule(name, FieldRule::Copy)
    }

    pub fn compute<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn NativeEvent) -> Value + 'static,
    {
        self.rule(name, FieldRule::compute(f))
    }

    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rule(name, FieldRule::Constant(value.into()))
    }

    pub fn rule(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.schema.insert(name.into(), rule);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::{ComputeFn, FieldRule, Schema};
    use serde_json::{Value, json};
    use std::rc::Rc;

    fn base() -> Schema {
        Schema::builder()
            .copy("a")
            .compute("b", |e| e.field("b").unwrap_or(Value::Null))
            .build()
    }

    #[test]
    fn child_fields_are_appended_after_parent_fields() {
        let child = base().merged(&Schema::builder().copy("c").build());
        let names: Vec<&str> = child.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn override_keeps_position_and_only_touches_that_field() {
        let parent = base();
        let child = parent.merged(&Schema::builder().constant("b", 7).build());

        assert_eq!(child.position("b"), Some(1));
        assert!(matches!(child.rule("a"), Some(FieldRule::Copy)));
        assert!(matches!(child.rule("b"), Some(FieldRule::Constant(v)) if *v == json!(7)));
        // 父 Schema 不受影响
        assert!(matches!(parent.rule("b"), Some(FieldRule::Compute(_))));
    }

    #[test]
    fn unset_child_entry_means_copy_not_inherit() {
        let parent = base();
        let unset: Option<ComputeFn> = None;
        let child = parent.merged(&Schema::from_iter([("b", FieldRule::from(unset))]));
        assert!(matches!(child.rule("b"), Some(FieldRule::Copy)));

        let f: ComputeFn = Rc::new(|_| json!(1));
        let child = parent.merged(&Schema::from_iter([("b", FieldRule::from(Some(f)))]));
        assert!(matches!(child.rule("b"), Some(FieldRule::Compute(_))));
    }

    #[test]
    fn copy_of_target_reads_the_raw_target() {
        let raw = json!({ "type": "click", "target": "from-event" });
        let raw_target = json!("node-1");
        assert_eq!(FieldRule::Copy.normalize("target", &raw, &raw_target), json!("node-1"));
        assert_eq!(FieldRule::Copy.normalize("type", &raw, &raw_target), json!("click"));
        assert_eq!(FieldRule::Copy.normalize("missing", &raw, &raw_target), Value::Null);
    }
}
