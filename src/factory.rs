use crate::error::UnknownTag;
use crate::unique::Unique;

/// A capability with a single polymorphic entry point.
///
/// Concrete implementations are selected by [`ActionKind`] and handed out
/// behind `Unique<dyn Action>`, so callers invoke them without knowing the
/// concrete variant. The returned report identifies what ran.
///
/// 只有一个多态入口的能力。
///
/// 具体实现由 [`ActionKind`] 选择，并以 `Unique<dyn Action>` 的形式
/// 交出，调用方无需知道具体变体即可调用。返回的报告标识执行了什么。
pub trait Action {
    /// Execute the action once and report what ran.
    /// 执行一次动作并报告执行了什么。
    fn perform(&mut self) -> &'static str;
}

/// The closed set of action variants the factory can construct.
///
/// Being an enum, an unknown discriminator is unrepresentable here; raw
/// external tags enter through [`TryFrom<u8>`], which rejects unknown bytes
/// with a typed error instead of producing a valid-looking empty handle.
///
/// ```
/// use uniq_rc::{Action, ActionKind, Unique};
///
/// let mut actions: Vec<Unique<dyn Action>> =
///     ActionKind::ALL.iter().map(|kind| kind.create()).collect();
///
/// // Each variant reports a distinct action.
/// let reports: Vec<&str> = actions.iter_mut().map(|a| a.perform()).collect();
/// assert_eq!(reports, ["compacted free slots", "flushed pending disposals",
///                      "verified count invariants"]);
///
/// // Replacing a handle's content reflects the new variant.
/// actions[2] = ActionKind::Flush.create();
/// assert_eq!(actions[2].perform(), "flushed pending disposals");
/// ```
///
/// 工厂能够构造的动作变体的封闭集合。
///
/// 由于是枚举，未知判别值在这里无法表示；外部的原始标签经由
/// [`TryFrom<u8>`] 进入，未知字节会以带类型的错误被拒绝，
/// 而不是产出一个看似有效的空句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Compact free slots in a store.
    /// 压缩存储中的空闲槽位。
    Compact,
    /// Flush pending disposals.
    /// 冲刷待处理的释放。
    Flush,
    /// Verify count invariants.
    /// 校验计数不变量。
    Verify,
}

impl ActionKind {
    /// Every variant, in tag order.
    /// 按标签顺序排列的全部变体。
    pub const ALL: [ActionKind; 3] = [ActionKind::Compact, ActionKind::Flush, ActionKind::Verify];

    /// Construct the concrete implementation for this variant, owned
    /// exclusively and invoked through the abstract [`Action`] trait.
    ///
    /// 构造该变体的具体实现，独占持有，并通过抽象的 [`Action`]
    /// 特征调用。
    pub fn create(self) -> Unique<dyn Action> {
        match self {
            ActionKind::Compact => Unique::from_box(Box::new(Compact::default())),
            ActionKind::Flush => Unique::from_box(Box::new(Flush::default())),
            ActionKind::Verify => Unique::from_box(Box::new(Verify::default())),
        }
    }
}

impl TryFrom<u8> for ActionKind {
    type Error = UnknownTag;

    fn try_from(tag: u8) -> Result<Self, UnknownTag> {
        match tag {
            0 => Ok(ActionKind::Compact),
            1 => Ok(ActionKind::Flush),
            2 => Ok(ActionKind::Verify),
            other => Err(UnknownTag(other)),
        }
    }
}

#[derive(Default)]
struct Compact {
    runs: u32,
}

impl Action for Compact {
    fn perform(&mut self) -> &'static str {
        self.runs += 1;
        "compacted free slots"
    }
}

#[derive(Default)]
struct Flush {
    runs: u32,
}

impl Action for Flush {
    fn perform(&mut self) -> &'static str {
        self.runs += 1;
        "flushed pending disposals"
    }
}

#[derive(Default)]
struct Verify {
    runs: u32,
}

impl Action for Verify {
    fn perform(&mut self) -> &'static str {
        self.runs += 1;
        "verified count invariants"
    }
}
