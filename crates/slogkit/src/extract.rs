//! Context attribute extraction

use crate::attr::Attr;
use crate::context::Context;
use crate::core::ExtractError;

/// Turns a request context into attributes for the record being emitted.
///
/// Closures with the matching signature implement this trait.
///
/// ```rust
/// use slogkit::{Attr, Context, ContextExtractor, ExtractError};
///
/// let tenant = |ctx: &Context| -> Result<Vec<Attr>, ExtractError> {
///     ctx.field("tenant")
///         .map(|v| vec![Attr::new("tenant", v.clone())])
///         .ok_or_else(|| ExtractError::new("tenant missing"))
/// };
///
/// let ctx = Context::new().with_field("tenant", "acme");
/// assert_eq!(tenant.extract(&ctx).unwrap(), vec![Attr::string("tenant", "acme")]);
/// ```
pub trait ContextExtractor: Send + Sync {
    /// Extract ordered attributes from `ctx`
    fn extract(&self, ctx: &Context) -> Result<Vec<Attr>, ExtractError>;
}

impl<F> ContextExtractor for F
where
    F: Fn(&Context) -> Result<Vec<Attr>, ExtractError> + Send + Sync,
{
    fn extract(&self, ctx: &Context) -> Result<Vec<Attr>, ExtractError> {
        self(ctx)
    }
}

/// Extractor for the crate's own [`Context`] fields.
///
/// Emits `request_id`, `user_id`, `session_id` when set, then the free-form
/// fields in key order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFields;

impl ContextExtractor for ContextFields {
    fn extract(&self, ctx: &Context) -> Result<Vec<Attr>, ExtractError> {
        let ids = [
            ("request_id", &ctx.request_id),
            ("user_id", &ctx.user_id),
            ("session_id", &ctx.session_id),
        ];

        let mut attrs: Vec<Attr> = ids
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| Attr::string(key, v.clone())))
            .collect();
        attrs.extend(
            ctx.fields
                .iter()
                .map(|(key, value)| Attr::new(key.clone(), value.clone())),
        );
        Ok(attrs)
    }
}
