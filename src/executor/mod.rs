mod dml;
mod filter;
mod query;

pub use dml::DmlExecutor;
pub use filter::FilterExecutor;
pub use query::SelectExecutor;

use crate::core::{QueryError, Table};
use crate::parser::{CommandParser, tokenize};
use crate::plan::{ExecutionPlanBuilder, SortDirection, Stage};
use crate::storage::TableStore;
use std::path::PathBuf;

/// Mutable state threaded through stage execution. Built fresh for every
/// command from the ordered plan and discarded afterwards.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    /// Path the FROM/UPDATE stage loaded, used by SET/DELETE rewrites.
    pub source_path: Option<PathBuf>,
    pub source: Option<Table>,
    /// Row indices into `source` selected by WHERE/AND/OR. `None` until
    /// WHERE runs; OR may append duplicate indices.
    pub filtered: Option<Vec<usize>>,
    pub projected: Option<Table>,
    pub secondary: Option<Table>,
    pub combined: Option<Table>,
    /// Set when ordering already happened before projection, turning the
    /// later ORDER stage into a no-op.
    pub ordered_early: bool,
    pub has_join: bool,
    pub has_order: bool,
    pub has_where: bool,
    /// The SELECT used `*`.
    pub wildcard: bool,
    pub order: Option<(String, SortDirection)>,
    pub output: Vec<String>,
}

impl ExecutionContext {
    #[must_use]
    pub fn from_plan(plan: &[Stage]) -> Self {
        Self {
            has_join: plan.iter().any(|s| matches!(s, Stage::Join(_))),
            has_order: plan.iter().any(|s| matches!(s, Stage::Order { .. })),
            has_where: plan.iter().any(|s| matches!(s, Stage::Where(_))),
            wildcard: plan
                .iter()
                .any(|s| matches!(s, Stage::Selected(cols) if cols.iter().any(|c| c == "*"))),
            order: plan.iter().find_map(|s| match s {
                Stage::Order { column, direction } => Some((column.clone(), *direction)),
                _ => None,
            }),
            ..Self::default()
        }
    }

    /// True while an ORDER stage is still expected to produce the output.
    #[must_use]
    pub const fn order_pending(&self) -> bool {
        self.has_order && !self.ordered_early
    }
}

pub struct QueryExecutor;

impl QueryExecutor {
    /// Run one raw command line: tokenize, parse, plan, execute. Returns
    /// the formatted result rows (empty for mutation commands). Every
    /// failure kind surfaces here; nothing is caught inside stages.
    pub fn execute_command(line: &str) -> Result<Vec<String>, QueryError> {
        let tokens = tokenize(line)?;
        let command = CommandParser::parse(&tokens)?;
        let plan = ExecutionPlanBuilder::build(command)?;
        Self::execute(&plan)
    }

    /// Execute an already-built plan against a fresh context.
    pub fn execute(plan: &[Stage]) -> Result<Vec<String>, QueryError> {
        let mut ctx = ExecutionContext::from_plan(plan);
        for stage in plan {
            Self::run_stage(&mut ctx, stage)?;
        }
        Ok(ctx.output)
    }

    fn run_stage(ctx: &mut ExecutionContext, stage: &Stage) -> Result<(), QueryError> {
        match stage {
            Stage::From(file) | Stage::Update(file) => load_source(ctx, file),
            Stage::Where(predicate) => FilterExecutor::apply_where(ctx, predicate),
            Stage::And(predicate) => FilterExecutor::apply_and(ctx, predicate),
            Stage::Or(predicate) => FilterExecutor::apply_or(ctx, predicate),
            Stage::Selected(columns) => SelectExecutor::project(ctx, columns),
            Stage::Join(file) => SelectExecutor::join(ctx, file),
            Stage::On { left, right } => SelectExecutor::merge_on(ctx, left, right),
            Stage::Order { column, direction } => SelectExecutor::order(ctx, column, *direction),
            Stage::Insert { file, payload } => DmlExecutor::insert(file, payload),
            Stage::Deletes => DmlExecutor::deletes(ctx),
            Stage::Set(assignments) => DmlExecutor::set(ctx, assignments),
        }
    }
}

fn load_source(ctx: &mut ExecutionContext, file: &str) -> Result<(), QueryError> {
    ctx.source = Some(TableStore::load(file)?);
    ctx.source_path = Some(PathBuf::from(file));
    Ok(())
}

pub(crate) fn require_table<'a>(
    table: &'a Option<Table>,
    clause: &str,
) -> Result<&'a Table, QueryError> {
    table
        .as_ref()
        .ok_or_else(|| QueryError::Syntax(format!("missing {clause} clause")))
}
