//! The verify/generate step.
//!
//! Verification never aborts for a bad stamp: the outcome is reported via
//! `hashcash_isValid` and `hashcash_reason`. Abort is reserved for bad
//! configuration and for stamps that cannot be parsed.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use tracing::{debug, warn};

use crate::{CalloutError, Properties, VariableContext};
use hashcash_types::{Clock, SystemClock, Version};
use hashcash_utils::format_iso_tenths;
use hashcash_verification::{FailureReason, TimeCheck, Verdict, Verifier, VerifyPolicy};
use hashcash_work::{MintRequest, Token, TokenMinter};

/// Prefix of every variable the callout writes.
pub const VAR_PREFIX: &str = "hashcash_";

/// Returned to the host after [`HashcashCallout::execute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionResult {
    Success,
    Abort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Verify,
    Generate,
}

pub struct HashcashCallout<C = SystemClock> {
    properties: Properties,
    clock: C,
}

impl HashcashCallout<SystemClock> {
    pub fn new(properties: Properties) -> Self {
        Self::with_clock(properties, SystemClock)
    }
}

impl<C: Clock> HashcashCallout<C> {
    pub fn with_clock(properties: Properties, clock: C) -> Self {
        Self { properties, clock }
    }

    pub fn execute<V>(&self, ctx: &mut V) -> ExecutionResult
    where
        V: VariableContext + ?Sized,
    {
        for name in ["error", "exception", "stacktrace", "reason", "isValid"] {
            ctx.remove(&var_name(name));
        }
        match self.run(ctx) {
            Ok(()) => ExecutionResult::Success,
            Err(e) => {
                self.record_error(ctx, &e);
                ExecutionResult::Abort
            }
        }
    }

    fn run<V>(&self, ctx: &mut V) -> Result<(), CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        match self.action(ctx)? {
            Action::Verify => self.verify(ctx),
            Action::Generate => self.generate(ctx),
        }
    }

    fn verify<V>(&self, ctx: &mut V) -> Result<(), CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        set_var(ctx, "isValid", "false");
        let Some(hash) = self.properties.optional("hash", ctx) else {
            set_var(ctx, "reason", "hash resolves to an empty string");
            return Ok(());
        };
        set_var(ctx, "hash", hash.as_str());

        let token = Token::parse_with(&hash, &self.hash_function(ctx))?;
        if token.version() != self.version(ctx)? {
            set_var(ctx, "reason", FailureReason::IncorrectVersion.to_string());
            return Ok(());
        }

        // Read only once the stamp itself is known to be usable.
        let required_bits = self.required_bits(ctx)?;
        let time_allowance = self.time_allowance(ctx)?;
        let mut policy = VerifyPolicy::new(required_bits)
            .time_allowance_ms(time_allowance)
            .any_version();
        if let Some(resource) = self.properties.optional("requiredResource", ctx) {
            policy = policy.require_resource(resource);
        }

        let verdict = Verifier::with_clock(policy, &self.clock).verify_token(token);
        record_verdict(ctx, &verdict, time_allowance);
        Ok(())
    }

    fn generate<V>(&self, ctx: &mut V) -> Result<(), CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        let resource = self.properties.required("resource", ctx)?;
        let required_bits = self.required_bits(ctx)?;
        let request = MintRequest::new(resource, required_bits)
            .version(self.version(ctx)?.as_u32())
            .hash_function(self.hash_function(ctx))
            .timestamp(self.clock.now());

        let token = TokenMinter::new().mint(&request)?;
        set_var(ctx, "hash", token.as_str());
        set_var(ctx, "requiredBits", required_bits.to_string());
        set_var(ctx, "computedBits", token.computed_bits().to_string());
        record_time(ctx, "cashDate", &token.minted_at());
        Ok(())
    }

    fn action<V>(&self, ctx: &V) -> Result<Action, CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        let action = self.properties.required("action", ctx)?.to_ascii_lowercase();
        match action.as_str() {
            "verify" => Ok(Action::Verify),
            "generate" => Ok(Action::Generate),
            _ => Err(CalloutError::config(format!(
                "action value is unknown: ({action})"
            ))),
        }
    }

    fn required_bits<V>(&self, ctx: &V) -> Result<u32, CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        let value = self.properties.required("requiredBits", ctx)?;
        value
            .parse()
            .map_err(|_| CalloutError::config(format!("requiredBits is not a valid number: {value}")))
    }

    fn time_allowance<V>(&self, ctx: &V) -> Result<i64, CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        match self.properties.optional("timeAllowance", ctx) {
            None => Ok(hashcash_verification::DEFAULT_TIME_ALLOWANCE_MS),
            Some(value) => value.parse().map_err(|_| {
                CalloutError::config(format!("timeAllowance is not a valid number: {value}"))
            }),
        }
    }

    fn version<V>(&self, ctx: &V) -> Result<Version, CalloutError>
    where
        V: VariableContext + ?Sized,
    {
        match self.properties.optional("version", ctx) {
            None => Ok(Version::V1),
            Some(value) => {
                let number: u32 = value
                    .parse()
                    .map_err(|_| CalloutError::config(format!("version is not a valid number: {value}")))?;
                Ok(Version::try_from(number)?)
            }
        }
    }

    fn hash_function<V>(&self, ctx: &V) -> String
    where
        V: VariableContext + ?Sized,
    {
        self.properties.optional("hashFunction", ctx).unwrap_or_default()
    }

    fn record_error<V>(&self, ctx: &mut V, error: &CalloutError)
    where
        V: VariableContext + ?Sized,
    {
        warn!(%error, "hashcash callout aborted");
        set_var(ctx, "reason", "Exception");
        let exception = format!("{}: {error}", error.kind());
        set_var(ctx, "error", short_error(&exception));
        set_var(ctx, "exception", exception);
        if self.properties.flag("debug") {
            let trace = error_chain(error);
            debug!(trace = %trace, "hashcash callout failure detail");
            set_var(ctx, "stacktrace", trace);
        }
    }
}

fn var_name(name: &str) -> String {
    format!("{VAR_PREFIX}{name}")
}

fn set_var<V>(ctx: &mut V, name: &str, value: impl Into<String>)
where
    V: VariableContext + ?Sized,
{
    ctx.set(&var_name(name), value.into());
}

/// Epoch milliseconds under `label`, readable UTC under `<label>Formatted`.
fn record_time<V>(ctx: &mut V, label: &str, at: &DateTime<Utc>)
where
    V: VariableContext + ?Sized,
{
    set_var(ctx, label, at.timestamp_millis().to_string());
    set_var(ctx, &format!("{label}Formatted"), format_iso_tenths(at));
}

fn record_verdict<V>(ctx: &mut V, verdict: &Verdict, time_allowance: i64)
where
    V: VariableContext + ?Sized,
{
    set_var(ctx, "requiredBits", verdict.required_bits.to_string());
    if let Some(bits) = verdict.computed_bits {
        set_var(ctx, "computedBits", bits.to_string());
    }

    match &verdict.time_check {
        TimeCheck::NotReached => {}
        TimeCheck::Disabled => {
            set_var(ctx, "timeAllowance", time_allowance.to_string());
            set_var(ctx, "timeCheckDisabled", "true");
        }
        TimeCheck::Checked {
            minted_at,
            now,
            delta_ms,
        } => {
            set_var(ctx, "timeAllowance", time_allowance.to_string());
            record_time(ctx, "cashDate", minted_at);
            record_time(ctx, "now", now);
            set_var(ctx, "timeDelta", delta_ms.to_string());
        }
    }

    match &verdict.reason {
        None => set_var(ctx, "isValid", "true"),
        Some(reason) => set_var(ctx, "reason", reason.to_string()),
    }
}

/// The detail after the last colon of `Kind: message`.
fn short_error(exception: &str) -> &str {
    match exception.rfind(':') {
        Some(i) => exception[i + 1..].trim(),
        None => exception,
    }
}

fn error_chain(error: &dyn StdError) -> String {
    let mut lines = vec![error.to_string()];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {cause}"));
        source = cause.source();
    }
    lines.join("\n")
}
