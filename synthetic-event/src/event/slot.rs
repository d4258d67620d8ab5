use super::{DispatchConfig, TargetHandle};
use crate::{native_event::NativeEvent, schema::Schema};
use serde_json::Value;
use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    rc::Rc,
};

/// 池化的实例存储；句柄通过代次判断自己是否仍然有效
pub(crate) struct EventSlot {
    generation: Cell<u64>,
    state: RefCell<SlotState>,
}

#[derive(Default)]
pub(crate) struct SlotState {
    pub(crate) dispatch_config: Option<DispatchConfig>,
    pub(crate) target_handle: Option<TargetHandle>,
    pub(crate) native_event: Option<Rc<dyn NativeEvent>>,
    /// 与种类 Schema 的字段一一对应
    pub(crate) values: Vec<Value>,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) persistent: bool,
    /// 已 persist 的实例已经释放过一次；不拆卸，仅用于识别重复释放
    pub(crate) released_persistent: bool,
}

impl EventSlot {
    pub(crate) fn new() -> Self {
        Self {
            generation: Cell::new(0),
            state: RefCell::default(),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }

    pub(crate) fn state(&self) -> Ref<'_, SlotState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, SlotState> {
        self.state.borrow_mut()
    }

    /// 按 Schema 全量重新填充；无论槽位来自池还是新分配
    pub(crate) fn populate(
        &self,
        schema: &Schema,
        dispatch_config: DispatchConfig,
        target_handle: TargetHandle,
        native_event: Rc<dyn NativeEvent>,
        raw_target: &Value,
    ) {
        // 复用上一次的 values 分配；计算函数执行期间不持有借用
        let mut values = std::mem::take(&mut self.state.borrow_mut().values);
        values.clear();
        values.extend(
            schema
                .iter()
                .map(|(name, rule)| rule.normalize(name, native_event.as_ref(), raw_target)),
        );

        let default_prevented = native_event
            .default_prevented()
            .unwrap_or_else(|| native_event.return_value() == Some(false));

        *self.state.borrow_mut() = SlotState {
            dispatch_config: Some(dispatch_config),
            target_handle: Some(target_handle),
            native_event: Some(native_event),
            values,
            default_prevented,
            propagation_stopped: false,
            persistent: false,
            released_persistent: false,
        };
    }

    /// 清空全部字段与锁存，并使已发出的句柄失效
    pub(crate) fn teardown(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.values.iter_mut().for_each(|v| *v = Value::Null);
            state.dispatch_config = None;
            state.target_handle = None;
            state.native_event = None;
            state.default_prevented = false;
            state.propagation_stopped = false;
            state.persistent = false;
            state.released_persistent = false;
        }
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}
