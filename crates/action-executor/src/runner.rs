//! Per-action state machine orchestration

use std::time::Instant;

use action_locator::{re_resolve, DomPort, ElementHandle, ResolvedLocator};
use interpreter_bridge::{ActionMethod, ActionProposal};
use pagepilot_core_types::AutomationError;
use tracing::{debug, instrument, warn};

use crate::errors::ExecError;
use crate::keys::normalize_key;
use crate::model::{ActionReport, ActionState, ExecCtx};
use crate::policy::ExecutorPolicy;
use crate::ports::{DriverPort, TargetPort};
use crate::{tempo, wait};

/// Port bundle injected by the session layer.
pub struct RuntimeDeps<'a> {
    pub driver: &'a dyn DriverPort,
    pub dom: &'a dyn DomPort,
    pub target: Option<&'a dyn TargetPort>,
    pub policy: &'a ExecutorPolicy,
}

/// Drive one validated action to a terminal state. Never panics and never
/// swallows a failure: the report carries the terminal state and the typed
/// error that produced it.
#[instrument(skip_all, fields(action = %ctx.action_id.0, method = proposal.method.name()))]
pub async fn execute(
    ctx: &ExecCtx,
    proposal: &ActionProposal,
    locator: &ResolvedLocator,
    deps: RuntimeDeps<'_>,
) -> ActionReport {
    let mut report = ActionReport::new(Instant::now());

    report.state = ActionState::Resolving;
    let element = match resolve_with_retry(locator, deps.dom, ctx, deps.policy, &mut report).await {
        Ok(element) => element,
        Err(err) => {
            warn!(error = %err, "resolution failed");
            return report.fail(err);
        }
    };
    report.resolved_path = Some(locator.to_xpath());
    report.state = ActionState::Ready;

    // Interactive methods require the element attached, visible, and stable
    // immediately before the primitive call.
    if targets_element(proposal.method) {
        if let Err(err) = wait::until_actionable(deps.driver, &element, ctx, deps.policy).await {
            return report.fail(err);
        }
    }

    if ctx.expired() {
        let waited_ms = report.started_at.elapsed().as_millis() as u64;
        return report.fail(
            AutomationError::Timeout {
                operation: format!("{} dispatch", proposal.method.name()),
                waited_ms,
            },
        );
    }

    report.state = ActionState::Executing;
    // No retry from here on: side-effecting primitives are not safely
    // retriable without caller knowledge of partial effects.
    match dispatch(ctx, proposal, locator, &element, &deps, &mut report).await {
        Ok(()) => {
            report.ok = true;
            report.state = ActionState::Succeeded;
            debug!(path = report.resolved_path.as_deref().unwrap_or(""), "action succeeded");
            report.finish(Instant::now())
        }
        Err(err) => {
            warn!(error = %err, "action failed during execution");
            report.fail(err)
        }
    }
}

fn targets_element(method: ActionMethod) -> bool {
    !matches!(method, ActionMethod::Scroll | ActionMethod::Press)
}

/// Resolution with exactly one bounded retry, covering elements that have
/// not painted yet. Staleness that survives the retry is surfaced as-is.
async fn resolve_with_retry(
    locator: &ResolvedLocator,
    dom: &dyn DomPort,
    ctx: &ExecCtx,
    policy: &ExecutorPolicy,
    report: &mut ActionReport,
) -> Result<ElementHandle, AutomationError> {
    match re_resolve(locator, dom).await {
        Ok(element) => Ok(element),
        Err(err @ AutomationError::StaleLocator { .. }) if !ctx.expired() => {
            debug!(error = %err, "first resolution failed, retrying once");
            report.resolve_retried = true;
            tokio::time::sleep(policy.resolve_retry_wait.min(ctx.remaining())).await;
            re_resolve(locator, dom).await
        }
        Err(err) => Err(err),
    }
}

async fn dispatch(
    ctx: &ExecCtx,
    proposal: &ActionProposal,
    locator: &ResolvedLocator,
    element: &ElementHandle,
    deps: &RuntimeDeps<'_>,
    report: &mut ActionReport,
) -> Result<(), AutomationError> {
    let argument = proposal.arguments.first().map(String::as_str).unwrap_or("");

    match proposal.method {
        ActionMethod::Click => deps.driver.click(element).await,
        ActionMethod::Hover => deps.driver.hover(element).await,
        ActionMethod::Fill => {
            // Clear, then one atomic content replacement: fast, and free of
            // partial-character event noise.
            deps.driver.clear_value(element).await?;
            deps.driver.set_value(element, argument).await
        }
        ActionMethod::Type => type_text(ctx, element, argument, deps, report).await,
        ActionMethod::SelectOption => select_option(locator, element, argument, deps).await,
        ActionMethod::Scroll => scroll(argument, deps).await,
        ActionMethod::Press => {
            let key = normalize_key(argument)
                .ok_or_else(|| ExecError::UnknownKey(argument.to_string()))?;
            deps.driver.key_press(&key).await
        }
    }
}

async fn type_text(
    ctx: &ExecCtx,
    element: &ElementHandle,
    text: &str,
    deps: &RuntimeDeps<'_>,
    report: &mut ActionReport,
) -> Result<(), AutomationError> {
    deps.driver.clear_value(element).await?;

    let plan = {
        let mut rng = rand::thread_rng();
        tempo::build_plan(text, &deps.policy.keystroke_delay_ms, &mut rng)
    };

    for step in &plan.steps {
        if ctx.cancel.is_cancelled() {
            return Err(ExecError::Cancelled.into());
        }
        if ctx.remaining().is_zero() {
            return Err(AutomationError::Timeout {
                operation: "typing".into(),
                waited_ms: report.started_at.elapsed().as_millis() as u64,
            });
        }
        tokio::time::sleep(step.delay).await;
        deps.driver.key_stroke(element, step.ch).await?;
        report.keystrokes += 1;
    }
    Ok(())
}

async fn select_option(
    locator: &ResolvedLocator,
    element: &ElementHandle,
    requested: &str,
    deps: &RuntimeDeps<'_>,
) -> Result<(), AutomationError> {
    if locator.leaf_tag() == "select" {
        let options = deps.driver.options_of(element).await?;

        // Visible text first, option value as fallback.
        if options.iter().any(|option| option.label == requested) {
            return deps.driver.select_by_text(element, requested).await;
        }
        if let Some(by_value) = options.iter().find(|option| option.value == requested) {
            return deps.driver.select_by_text(element, &by_value.label).await;
        }
        return Err(AutomationError::OptionNotFound {
            requested: requested.to_string(),
            available: options.into_iter().map(|option| option.label).collect(),
        });
    }

    // Custom dropdown: open, locate the option by text, click it.
    deps.driver.click(element).await?;
    match deps.driver.find_text(requested).await? {
        Some(option) => deps.driver.click(&option).await,
        None => Err(AutomationError::OptionNotFound {
            requested: requested.to_string(),
            available: Vec::new(),
        }),
    }
}

async fn scroll(argument: &str, deps: &RuntimeDeps<'_>) -> Result<(), AutomationError> {
    if let Some(percent) = parse_percentage(argument) {
        let height = deps.driver.page_height().await?;
        let offset = height * (percent / 100.0);
        return deps.driver.scroll_to_offset(offset).await;
    }

    if argument.is_empty() {
        return Err(ExecError::BadScrollTarget(argument.to_string()).into());
    }

    // Semantic label: resolve it like a target instruction and bring the
    // labeled section into view.
    match deps.target {
        Some(target) => {
            let labeled = target.resolve_labeled(argument).await?;
            deps.driver.scroll_into_view(&labeled).await
        }
        None => Err(ExecError::NoTargetResolver(argument.to_string()).into()),
    }
}

fn parse_percentage(argument: &str) -> Option<f64> {
    let trimmed = argument.trim();
    let number = trimmed.strip_suffix('%')?.trim();
    let percent: f64 = number.parse().ok()?;
    if percent.is_finite() && (0.0..=100.0).contains(&percent) {
        Some(percent)
    } else {
        None
    }
}
