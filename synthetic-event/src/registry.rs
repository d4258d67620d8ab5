//! 事件种类注册表（EventRegistry）
//!
//! 注册表拥有全部种类的 Schema 与对象池：
//! - `define_base` 定义根种类；
//! - `extend` 在父种类的有效 Schema 上叠加片段，得到子种类并为其新建独立的池；
//! - `resolve_schema` 直接返回定义期预合并的 Schema，不做运行时继承链查找；
//! - `acquire`/`release` 委托给对应种类的 `EventKind`。
//!
//! 注册表与其种类均为单线程结构（`Rc` + 内部可变性），同一个池在同一时刻只
//! 服务一个派发序列。
//!
use crate::{
    config::PoolConfig,
    diagnostics::{Access, Diagnostics, MisuseReporter, TracingReporter},
    error::{EventError, EventResult},
    event::{DispatchConfig, SyntheticEvent, TargetHandle},
    native_event::NativeEvent,
    pool::{EventPool, PoolStats},
    schema::Schema,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};
use tracing::{debug, trace};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// 种类句柄；只在创建它的注册表内有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindHandle {
    registry: u64,
    index: usize,
}

impl fmt::Display for KindHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}@registry#{}", self.index, self.registry)
    }
}

/// 单个种类：预合并的 Schema 与专属对象池
pub(crate) struct KindEntry {
    handle: KindHandle,
    name: String,
    parent: Option<KindHandle>,
    schema: Rc<Schema>,
    pool: EventPool,
    diagnostics: Rc<Diagnostics>,
}

impl KindEntry {
    pub(crate) fn handle(&self) -> KindHandle {
        self.handle
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn schema(&self) -> &Schema {
        &self.schema
    }

    pub(crate) fn report(&self, member: &str, access: Access) {
        self.diagnostics.report(&self.name, member, access);
    }

    fn acquire(
        self: &Rc<Self>,
        dispatch_config: DispatchConfig,
        target_handle: TargetHandle,
        native_event: Rc<dyn NativeEvent>,
        raw_target: Value,
    ) -> SyntheticEvent {
        let slot = self.pool.take();
        slot.populate(
            &self.schema,
            dispatch_config,
            target_handle,
            native_event,
            &raw_target,
        );
        trace!(kind = %self.name, pooled = self.pool.len(), "acquired synthetic event");
        SyntheticEvent::new(slot, Rc::clone(self))
    }

    fn release(&self, event: SyntheticEvent) -> EventResult<()> {
        if event.kind() != self.handle {
            return Err(EventError::KindMismatch {
                expected: self.name.clone(),
                found: event.kind_name().to_string(),
            });
        }

        // 重复释放或释放过期句柄：只上报，绝不二次入池
        if event.is_released() {
            self.report("release", Access::CallMethod);
            return Ok(());
        }

        if event.persistent_unchecked() {
            if event.mark_persistent_released() {
                self.report("release", Access::CallMethod);
                return Ok(());
            }
            self.pool.note_persisted();
            trace!(kind = %self.name, "persisted synthetic event left out of the pool");
            return Ok(());
        }

        let slot = event.into_slot();
        slot.teardown();
        if self.pool.put_back(slot) {
            trace!(kind = %self.name, pooled = self.pool.len(), "released synthetic event into the pool");
        } else {
            trace!(kind = %self.name, capacity = self.pool.capacity(), "pool full, discarded synthetic event");
        }
        Ok(())
    }
}

/// 某个种类的生命周期管理视图，可克隆并脱离注册表使用
#[derive(Clone)]
pub struct EventKind {
    entry: Rc<KindEntry>,
}

impl EventKind {
    pub fn handle(&self) -> KindHandle {
        self.entry.handle
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn parent(&self) -> Option<KindHandle> {
        self.entry.parent
    }

    pub fn schema(&self) -> Rc<Schema> {
        Rc::clone(&self.entry.schema)
    }

    /// 从池中取出或新建实例，并按 Schema 全量填充
    pub fn acquire(
        &self,
        dispatch_config: DispatchConfig,
        target_handle: TargetHandle,
        native_event: Rc<dyn NativeEvent>,
        raw_target: Value,
    ) -> SyntheticEvent {
        self.entry
            .acquire(dispatch_config, target_handle, native_event, raw_target)
    }

    /// 释放实例：非本种类的实例返回 `KindMismatch`，此时传入的句柄被丢弃，
    /// 实例既不拆卸也不入池；已 persist 的实例保持原样、不入池，再次释放只上报；
    /// 其余实例拆卸后在池未满时入池
    pub fn release(&self, event: SyntheticEvent) -> EventResult<()> {
        self.entry.release(event)
    }

    pub fn pool_len(&self) -> usize {
        self.entry.pool.len()
    }

    pub fn pool_capacity(&self) -> usize {
        self.entry.pool.capacity()
    }

    pub fn stats(&self) -> PoolStats {
        self.entry.pool.stats()
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventKind")
            .field("handle", &self.entry.handle)
            .field("name", &self.entry.name)
            .field("parent", &self.entry.parent)
            .field("schema", &self.entry.schema)
            .finish()
    }
}

/// 事件种类注册表
pub struct EventRegistry {
    id: u64,
    config: PoolConfig,
    diagnostics: Rc<Diagnostics>,
    kinds: Vec<Rc<KindEntry>>,
    by_name: HashMap<String, KindHandle>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::from_parts(PoolConfig::default(), Box::new(TracingReporter))
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PoolConfig) -> EventResult<Self> {
        Self::with_reporter(config, TracingReporter)
    }

    /// 使用自定义误用上报通道
    pub fn with_reporter<R>(config: PoolConfig, reporter: R) -> EventResult<Self>
    where
        R: MisuseReporter + 'static,
    {
        config.validate()?;
        Ok(Self::from_parts(config, Box::new(reporter)))
    }

    fn from_parts(config: PoolConfig, reporter: Box<dyn MisuseReporter>) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            config,
            diagnostics: Rc::new(Diagnostics::new(config.diagnostics(), reporter)),
            kinds: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    // ---- 种类定义 ----

    /// 定义根种类
    pub fn define_base(
        &mut self,
        name: impl Into<String>,
        schema: Schema,
    ) -> EventResult<KindHandle> {
        self.register(name.into(), None, schema)
    }

    /// 以 `parent` 的有效 Schema 为基础叠加 `fragment` 定义子种类；子种类拥有独立的池
    pub fn extend(
        &mut self,
        parent: KindHandle,
        name: impl Into<String>,
        fragment: Schema,
    ) -> EventResult<KindHandle> {
        let schema = self.entry(parent)?.schema.merged(&fragment);
        self.register(name.into(), Some(parent), schema)
    }

    fn register(
        &mut self,
        name: String,
        parent: Option<KindHandle>,
        schema: Schema,
    ) -> EventResult<KindHandle> {
        if self.by_name.contains_key(&name) {
            return Err(EventError::DuplicateKind { name });
        }

        let handle = KindHandle {
            registry: self.id,
            index: self.kinds.len(),
        };
        debug!(
            kind = %name,
            parent = ?parent.and_then(|p| self.lookup_name(p)),
            fields = schema.len(),
            "defined synthetic event kind"
        );

        self.kinds.push(Rc::new(KindEntry {
            handle,
            name: name.clone(),
            parent,
            schema: Rc::new(schema),
            pool: EventPool::new(self.config.capacity()),
            diagnostics: Rc::clone(&self.diagnostics),
        }));
        self.by_name.insert(name, handle);
        Ok(handle)
    }

    // ---- 查询 ----

    /// 预合并的有效 Schema，O(1)
    pub fn resolve_schema(&self, kind: KindHandle) -> EventResult<Rc<Schema>> {
        Ok(Rc::clone(&self.entry(kind)?.schema))
    }

    pub fn kind(&self, kind: KindHandle) -> EventResult<EventKind> {
        Ok(EventKind {
            entry: Rc::clone(self.entry(kind)?),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<KindHandle> {
        self.by_name.get(name).copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.kinds.iter().map(|entry| EventKind {
            entry: Rc::clone(entry),
        })
    }

    pub fn pool_len(&self, kind: KindHandle) -> EventResult<usize> {
        Ok(self.entry(kind)?.pool.len())
    }

    pub fn stats(&self, kind: KindHandle) -> EventResult<PoolStats> {
        Ok(self.entry(kind)?.pool.stats())
    }

    // ---- 生命周期 ----

    /// 获取 `kind` 的实例；仅在种类句柄无效时失败
    pub fn acquire(
        &self,
        kind: KindHandle,
        dispatch_config: DispatchConfig,
        target_handle: TargetHandle,
        native_event: Rc<dyn NativeEvent>,
        raw_target: Value,
    ) -> EventResult<SyntheticEvent> {
        Ok(self
            .entry(kind)?
            .acquire(dispatch_config, target_handle, native_event, raw_target))
    }

    /// 将实例释放回 `kind` 的池；语义同 `EventKind::release`
    pub fn release(&self, kind: KindHandle, event: SyntheticEvent) -> EventResult<()> {
        self.entry(kind)?.release(event)
    }

    fn entry(&self, kind: KindHandle) -> EventResult<&Rc<KindEntry>> {
        if kind.registry != self.id {
            return Err(EventError::UnknownKind {
                kind: kind.to_string(),
            });
        }
        self.kinds
            .get(kind.index)
            .ok_or_else(|| EventError::UnknownKind {
                kind: kind.to_string(),
            })
    }

    fn lookup_name(&self, kind: KindHandle) -> Option<&str> {
        self.entry(kind).ok().map(|e| e.name.as_str())
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("kinds", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
