use bon::Builder;
use serde::{Deserialize, Serialize};

/// 捕获/冒泡两阶段的监听注册名（如 `onClickCapture` / `onClick`）
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasedRegistrationNames {
    #[builder(into)]
    bubbled: String,
    #[builder(into)]
    captured: String,
}

impl PhasedRegistrationNames {
    pub fn bubbled(&self) -> &str {
        &self.bubbled
    }

    pub fn captured(&self) -> &str {
        &self.captured
    }
}

/// 一次派发的配置；两阶段事件使用 `phased_registration_names`，
/// 只派发到目标本身的事件（如 `mouseenter`）使用 `registration_name`
#[derive(Builder, Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[builder(into)]
    registration_name: Option<String>,
    phased_registration_names: Option<PhasedRegistrationNames>,
    /// 该事件依赖的顶层原生事件类型
    #[builder(default)]
    dependencies: Vec<String>,
}

impl DispatchConfig {
    /// 两阶段事件的便捷构造：`on{Name}` 与 `on{Name}Capture`
    pub fn phased(bubbled: impl Into<String>) -> Self {
        let bubbled = bubbled.into();
        let captured = format!("{bubbled}Capture");
        Self::builder()
            .phased_registration_names(
                PhasedRegistrationNames::builder()
                    .bubbled(bubbled)
                    .captured(captured)
                    .build(),
            )
            .build()
    }

    pub fn registration_name(&self) -> Option<&str> {
        self.registration_name.as_deref()
    }

    pub fn phased_registration_names(&self) -> Option<&PhasedRegistrationNames> {
        self.phased_registration_names.as_ref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}
