// ==========================================
// 周排班推荐引擎 - 命令行入口
// ==========================================
// 输入: 应用快照 JSON ({ weeks, members }) + 可选草案 JSON
// 输出: stdout 打印 pretty JSON, 日志走 stderr
// ==========================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roster_engine::config::SUPPORTED_LOCALES;
use roster_engine::engine::{AbsenceRank, AssignmentRank, HistorySummary, RoleContribution};
use roster_engine::{i18n, logging, AppSnapshot, AssignmentAdvisor, ConfigManager, Draft, Part, Role, RoleSlot};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "roster-engine")]
#[command(about = "Weekly roster assignment recommendation and fairness engine", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件（缺省: ROSTER_ENGINE_CONFIG 或用户配置目录）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出语言 (ko / en), 覆盖配置文件
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a whole-week recommendation plan
    Plan {
        #[arg(long)]
        snapshot: PathBuf,
        /// Existing draft whose filled slots are kept
        #[arg(long)]
        draft: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        absent: Vec<String>,
    },
    /// Rank every candidate for one slot
    Candidates {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        part: Part,
        #[arg(long)]
        role: Role,
        /// Side seat (0 or 1)
        #[arg(long)]
        index: Option<u8>,
        #[arg(long, value_delimiter = ',')]
        absent: Vec<String>,
        /// Members already placed elsewhere this week
        #[arg(long, value_delimiter = ',')]
        assigned: Vec<String>,
    },
    /// Score a manual draft against the recommendations
    Evaluate {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        draft: PathBuf,
        #[arg(long, value_delimiter = ',')]
        absent: Vec<String>,
    },
    /// Compute warnings for a draft
    Warnings {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        draft: PathBuf,
        /// Week date of the draft (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// Fairness report over the whole history
    Fairness {
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Per-member statistics: role shares and rankings
    Stats {
        #[arg(long)]
        snapshot: PathBuf,
        /// Ranking size
        #[arg(long, default_value_t = 3)]
        top: usize,
    },
}

/// stats 子命令输出
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberStatsOutput {
    summary: HistorySummary,
    role_contributions: Vec<RoleContribution>,
    absence_ranking: Vec<AbsenceRank>,
    assignment_ranking: Vec<AssignmentRank>,
    underassigned_members: Vec<AssignmentRank>,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let manager = ConfigManager::load(cli.config.as_deref()).context("failed to load engine config")?;
    let locale = cli
        .locale
        .clone()
        .unwrap_or_else(|| manager.config().locale.clone());
    if !SUPPORTED_LOCALES.contains(&locale.as_str()) {
        bail!("unsupported locale '{}', expected one of {:?}", locale, SUPPORTED_LOCALES);
    }
    i18n::set_locale(&locale);

    let advisor = AssignmentAdvisor::from_manager(&manager);
    info!(
        version = roster_engine::VERSION,
        locale = %locale,
        config = ?manager.source(),
        "{}",
        roster_engine::APP_NAME
    );

    match cli.command {
        Commands::Plan {
            snapshot,
            draft,
            absent,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let draft = draft.as_deref().map(load_draft).transpose()?;
            let plan = advisor.generate_plan(&snapshot.weeks, &snapshot.members, &absent, draft.as_ref());
            print_json(&plan)?;
        }
        Commands::Candidates {
            snapshot,
            part,
            role,
            index,
            absent,
            assigned,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let slot = RoleSlot::new(part, role, index).context("invalid slot")?;
            let ranked = advisor.rank_slot_candidates(&snapshot.weeks, &snapshot.members, &slot, &absent, &assigned)?;
            print_json(&ranked)?;
        }
        Commands::Evaluate {
            snapshot,
            draft,
            absent,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let draft = load_draft(&draft)?;
            let evaluation = advisor.evaluate_draft(&snapshot.weeks, &snapshot.members, &draft, &absent);
            print_json(&evaluation)?;
        }
        Commands::Warnings {
            snapshot,
            draft,
            date,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let draft = load_draft(&draft)?;
            let warnings = advisor.compute_warnings(date, &draft, &snapshot.weeks, &snapshot.members);
            print_json(&warnings)?;
        }
        Commands::Fairness { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let summary = advisor.history_summary(&snapshot.weeks, &snapshot.members);
            info!(
                weeks = summary.total_weeks,
                members = summary.active_members,
                assignments = summary.total_slot_assignments,
                per_week = summary.average_assignments_per_week,
                "历史概况"
            );
            let report = advisor.fairness_report(&snapshot.weeks, &snapshot.members);
            print_json(&report)?;
        }
        Commands::Stats { snapshot, top } => {
            let snapshot = load_snapshot(&snapshot)?;
            let (weeks, members) = (&snapshot.weeks, &snapshot.members);
            let output = MemberStatsOutput {
                summary: advisor.history_summary(weeks, members),
                role_contributions: advisor.role_contributions(weeks, members),
                absence_ranking: advisor.absence_ranking(weeks, members, top),
                assignment_ranking: advisor.assignment_ranking(weeks, members, top),
                underassigned_members: advisor.underassigned_members(weeks, members, top),
            };
            print_json(&output)?;
        }
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> anyhow::Result<AppSnapshot> {
    AppSnapshot::load(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}

fn load_draft(path: &Path) -> anyhow::Result<Draft> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read draft {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse draft {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
