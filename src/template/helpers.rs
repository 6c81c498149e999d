// ABOUTME: Handlebars helper functions for job template rendering
// ABOUTME: Implements env lookups, default values, case conversion, joins, base64 and timestamps

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output, PathAndJson,
    RenderContext, RenderError, RenderErrorReason, Renderable,
};
use std::fmt::Write as _;
use std::sync::Arc;

use super::context::{display_value, lookup, EnvironmentReader};

/// Misuse of a helper: wrong arity or parameter type
fn helper_error(message: impl Into<String>) -> RenderError {
    RenderErrorReason::Other(message.into()).into()
}

/// Failure while evaluating a well-formed helper call
fn runtime_error<E>(err: E) -> RenderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    RenderErrorReason::NestedError(Box::new(err)).into()
}

/// Fetch a parameter, surfacing a missing context path as a missing variable
fn required_param<'a, 'rc>(
    h: &'a Helper<'rc>,
    index: usize,
    helper: &str,
) -> Result<&'a PathAndJson<'rc>, RenderError> {
    let param = h.param(index).ok_or_else(|| {
        helper_error(format!("{} helper requires parameter {}", helper, index + 1))
    })?;

    if param.is_value_missing() {
        return Err(RenderErrorReason::MissingVariable(param.relative_path().cloned()).into());
    }
    Ok(param)
}

fn string_param<'a>(h: &'a Helper, index: usize, helper: &str) -> Result<&'a str, RenderError> {
    required_param(h, index, helper)?
        .value()
        .as_str()
        .ok_or_else(|| {
            helper_error(format!(
                "{} helper parameter {} must be a string",
                helper,
                index + 1
            ))
        })
}

/// `{{env "NAME" ["fallback"]}}` - reads through the injected environment.
/// An unset variable renders the fallback, or nothing.
pub fn env_helper(
    reader: Arc<dyn EnvironmentReader>,
) -> impl Fn(&Helper, &Handlebars, &Context, &mut RenderContext, &mut dyn Output) -> HelperResult
       + Send
       + Sync {
    move |h: &Helper,
          _: &Handlebars,
          _: &Context,
          _: &mut RenderContext,
          out: &mut dyn Output|
          -> HelperResult {
        let name = string_param(h, 0, "env")?;
        let fallback = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

        let value = reader.get(name).unwrap_or_else(|| fallback.to_string());
        out.write(&value)?;
        Ok(())
    }
}

/// `{{default "var_name" "fallback"}}` - the variable's value, or the fallback
/// when it is absent or null. The variable is named by string so a missing
/// value does not trip strict mode.
pub fn default_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let name = string_param(h, 0, "default")?;
    let fallback = required_param(h, 1, "default")?.value();

    let value = match lookup(ctx.data(), name) {
        Some(value) if !value.is_null() => value,
        _ => fallback,
    };

    out.write(&display_value(value))?;
    Ok(())
}

/// Uppercase helper
pub fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = display_value(required_param(h, 0, "upper")?.value());
    out.write(&input.to_uppercase())?;
    Ok(())
}

/// Lowercase helper
pub fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = display_value(required_param(h, 0, "lower")?.value());
    out.write(&input.to_lowercase())?;
    Ok(())
}

/// `{{join ", " list}}` - joins list elements with a separator
pub fn join_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let separator = string_param(h, 0, "join")?;
    let array = required_param(h, 1, "join")?
        .value()
        .as_array()
        .ok_or_else(|| helper_error("join helper requires a list parameter"))?;

    let joined = array
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(separator);
    out.write(&joined)?;
    Ok(())
}

/// Base64 encode helper
pub fn base64_encode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = display_value(required_param(h, 0, "base64_encode")?.value());
    out.write(&BASE64.encode(input.as_bytes()))?;
    Ok(())
}

/// Base64 decode helper
pub fn base64_decode_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let input = string_param(h, 0, "base64_decode")?;

    let decoded_bytes = BASE64.decode(input).map_err(runtime_error)?;
    let decoded = String::from_utf8(decoded_bytes).map_err(runtime_error)?;

    out.write(&decoded)?;
    Ok(())
}

/// Current UTC time with an optional chrono format string
pub fn timestamp_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _rc: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let format = h
        .param(0)
        .and_then(|v| v.value().as_str())
        .unwrap_or("%Y-%m-%dT%H:%M:%SZ");

    let mut formatted = String::new();
    write!(formatted, "{}", Utc::now().format(format))
        .map_err(|_| helper_error(format!("invalid timestamp format '{}'", format)))?;

    out.write(&formatted)?;
    Ok(())
}

/// `#if` / `#unless` that treat an undefined condition as a missing variable
/// instead of as false.
#[derive(Clone, Copy)]
pub struct StrictConditional {
    negate: bool,
}

impl HelperDef for StrictConditional {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = if self.negate { "unless" } else { "if" };
        let condition = required_param(h, 0, name)?;

        let include_zero = h
            .hash_get("includeZero")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(false);
        let truthy = condition.value().is_truthy(include_zero) != self.negate;

        let branch = if truthy { h.template() } else { h.inverse() };
        match branch {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Register all built-in helpers with a Handlebars instance
pub fn register_helpers(handlebars: &mut Handlebars, env: Arc<dyn EnvironmentReader>) {
    handlebars.register_helper("if", Box::new(StrictConditional { negate: false }));
    handlebars.register_helper("unless", Box::new(StrictConditional { negate: true }));
    handlebars.register_helper("env", Box::new(env_helper(env)));
    handlebars.register_helper("default", Box::new(default_helper));
    handlebars.register_helper("upper", Box::new(upper_helper));
    handlebars.register_helper("lower", Box::new(lower_helper));
    handlebars.register_helper("join", Box::new(join_helper));
    handlebars.register_helper("base64_encode", Box::new(base64_encode_helper));
    handlebars.register_helper("base64_decode", Box::new(base64_decode_helper));
    handlebars.register_helper("timestamp", Box::new(timestamp_helper));
}
