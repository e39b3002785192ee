// ==========================================
// 端到端测试: 配置文件 + 快照文件 → 编排器
// ==========================================
// 覆盖 CLI 的完整数据流（不经过命令行解析）
// ==========================================

mod helpers;

use helpers::history_builder::{sunday, HistoryBuilder, WeekBuilder};
use roster_engine::{AppSnapshot, AssignmentAdvisor, ConfigError, ConfigManager, Member, Part, Role};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn snapshot_json() -> String {
    let weeks = HistoryBuilder::new()
        .week(
            0,
            WeekBuilder::new()
                .assign(Part::Part1, Role::Technical, "1 Ana")
                .assign(Part::Part2, Role::Technical, "2 Bo")
                .side(Part::Part1, 0, "3 Cy"),
        )
        .week(
            1,
            WeekBuilder::new()
                .assign(Part::Part1, Role::Technical, "2 Bo")
                .assign(Part::Part1, Role::Sketch, "4 Di")
                .absent("5 Ed"),
        )
        .build();
    let members = ["1 Ana", "2 Bo", "3 Cy", "4 Di", "5 Ed", "6 Fa", "7 Gi"]
        .iter()
        .map(|n| Member::new(n, true))
        .collect();

    AppSnapshot { weeks, members }.to_json().unwrap()
}

#[test]
fn test_partial_config_file_with_snapshot() {
    let config = write_temp(r#"{ "planner": { "alternativesLimit": 2 }, "locale": "en" }"#);
    let snapshot = write_temp(&snapshot_json());

    let manager = ConfigManager::load(Some(config.path())).unwrap();
    assert_eq!(manager.source(), Some(config.path()));
    assert_eq!(manager.config().planner.alternatives_limit, 2);
    // 未出现的字段保持默认
    assert_eq!(manager.config().rules.continuous_window, 3);

    let snapshot = AppSnapshot::load(snapshot.path()).unwrap();
    let advisor = AssignmentAdvisor::from_manager(&manager);

    let plan = advisor.generate_plan(&snapshot.weeks, &snapshot.members, &[], None);
    assert!(plan.slots.iter().all(|s| s.alternatives.len() <= 2));

    let sw = plan.slots[0].recommended.as_ref().unwrap();
    assert_eq!(sw.display_name, "Ana");

    let warnings = advisor.compute_warnings(sunday(2), &plan.to_draft(), &snapshot.weeks, &snapshot.members);
    assert!(warnings.iter().all(|w| !w.message.is_empty()));

    let report = advisor.fairness_report(&snapshot.weeks, &snapshot.members);
    assert!(report.overall_score <= 100);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = write_temp(r#"{ "fairness": { "weights": { "opportunity": 0.9 } } }"#);
    let result = ConfigManager::load(Some(config.path()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));

    let config = write_temp(r#"{ "locale": "fr" }"#);
    assert!(matches!(ConfigManager::load(Some(config.path())), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_config_snapshot_round_trip() {
    let mut manager = ConfigManager::new();
    let mut config = manager.config().clone();
    config.rules.rotation_window = 6;

    let restored = ConfigManager::from_config(config).unwrap().get_config_snapshot().unwrap();
    manager.restore_config_from_snapshot(&restored).unwrap();
    assert_eq!(manager.config().rules.rotation_window, 6);

    assert!(manager.restore_config_from_snapshot("{ broken").is_err());
    assert_eq!(manager.config().rules.rotation_window, 6);
}
