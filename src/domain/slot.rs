// ==========================================
// 周排班推荐引擎 - 岗位槽位
// ==========================================
// 槽位 = (场次, 岗位, 席位?)
// 红线: Side 必须带席位 0/1, 其他岗位不得带席位
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::types::{Part, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSlot {
    pub part: Part,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u8>,
}

impl RoleSlot {
    /// 构造并校验槽位
    ///
    /// # 返回
    /// - Err(InvalidSlot): Side 缺少/越界席位, 或单席位岗位带了席位
    pub fn new(part: Part, role: Role, index: Option<u8>) -> Result<Self, DomainError> {
        let slot = Self { part, role, index };
        slot.validate()?;
        Ok(slot)
    }

    const fn single(part: Part, role: Role) -> Self {
        Self {
            part,
            role,
            index: None,
        }
    }

    const fn side(part: Part, index: u8) -> Self {
        Self {
            part,
            role: Role::Side,
            index: Some(index),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let valid = match (self.role, self.index) {
            (Role::Side, Some(i)) => (i as usize) < Role::Side.seats(),
            (Role::Side, None) => false,
            (_, None) => true,
            (_, Some(_)) => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidSlot {
                part: self.part.to_string(),
                role: self.role.to_string(),
                index: self.index,
            })
        }
    }

    /// 席位下标（单席位岗位恒为 0）
    pub fn seat(&self) -> usize {
        self.index.map(usize::from).unwrap_or(0)
    }

    /// 本地化标签, 例如 "1부 사이드(1)"
    pub fn label(&self) -> String {
        let base = format!("{} {}", self.part.label(), self.role.label());
        match (self.role, self.index) {
            (Role::Side, Some(i)) => format!("{}({})", base, i + 1),
            _ => base,
        }
    }
}

impl fmt::Display for RoleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}/{}#{}", self.part, self.role, i),
            None => write!(f, "{}/{}", self.part, self.role),
        }
    }
}

/// 每周槽位总数
pub const TOTAL_SLOTS: usize = 12;

/// 排班处理顺序（固定, 不可推导）
///
/// SW 候选池最小先排 → Side 体力负担大 → 字幕 → 固定机位 → 速写
pub const SLOT_ORDER: [RoleSlot; TOTAL_SLOTS] = [
    RoleSlot::single(Part::Part1, Role::Technical),
    RoleSlot::single(Part::Part2, Role::Technical),
    RoleSlot::side(Part::Part1, 0),
    RoleSlot::side(Part::Part1, 1),
    RoleSlot::side(Part::Part2, 0),
    RoleSlot::side(Part::Part2, 1),
    RoleSlot::single(Part::Part1, Role::Subtitle),
    RoleSlot::single(Part::Part2, Role::Subtitle),
    RoleSlot::single(Part::Part1, Role::FixedCamera),
    RoleSlot::single(Part::Part2, Role::FixedCamera),
    RoleSlot::single(Part::Part1, Role::Sketch),
    RoleSlot::single(Part::Part2, Role::Sketch),
];

/// 按场次 → 岗位的展示顺序列出全部槽位
pub fn list_slots() -> Vec<RoleSlot> {
    let mut slots = Vec::with_capacity(TOTAL_SLOTS);
    for part in Part::ALL {
        for role in Role::ALL {
            if role == Role::Side {
                slots.push(RoleSlot::side(part, 0));
                slots.push(RoleSlot::side(part, 1));
            } else {
                slots.push(RoleSlot::single(part, role));
            }
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slot_validation() {
        assert!(RoleSlot::new(Part::Part1, Role::Side, Some(1)).is_ok());
        assert!(RoleSlot::new(Part::Part1, Role::Side, None).is_err());
        assert!(RoleSlot::new(Part::Part2, Role::Side, Some(2)).is_err());
        assert!(RoleSlot::new(Part::Part2, Role::Subtitle, Some(0)).is_err());
        assert!(RoleSlot::new(Part::Part2, Role::Subtitle, None).is_ok());
    }

    #[test]
    fn test_slot_order_covers_every_slot_once() {
        let ordered: HashSet<RoleSlot> = SLOT_ORDER.iter().copied().collect();
        let listed: HashSet<RoleSlot> = list_slots().into_iter().collect();
        assert_eq!(ordered.len(), TOTAL_SLOTS);
        assert_eq!(ordered, listed);
        assert!(SLOT_ORDER.iter().all(|s| s.validate().is_ok()));
    }

    #[test]
    fn test_slot_order_priority() {
        assert_eq!(SLOT_ORDER[0].role, Role::Technical);
        assert_eq!(SLOT_ORDER[1].role, Role::Technical);
        assert_eq!(SLOT_ORDER[2], RoleSlot::side(Part::Part1, 0));
        assert_eq!(SLOT_ORDER[5], RoleSlot::side(Part::Part2, 1));
        assert_eq!(SLOT_ORDER[11], RoleSlot::single(Part::Part2, Role::Sketch));
    }

    #[test]
    fn test_slot_json_shape() {
        let slot = RoleSlot::side(Part::Part2, 1);
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(json["part"], "part2");
        assert_eq!(json["role"], "사이드");
        assert_eq!(json["index"], 1);

        let single = serde_json::to_value(RoleSlot::single(Part::Part1, Role::Sketch)).unwrap();
        assert!(single.get("index").is_none());
    }
}
