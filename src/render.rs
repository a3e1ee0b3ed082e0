use crate::{
    compile::{
        tree::{Each, Node},
        Scope, Template,
    },
    context::Lookup,
    expression::{evaluate_in, is_truthy},
    format::type_name,
    log::{EvaluateError, EvaluateErrorKind, RenderError},
    pipe::Pipe,
    region::Region,
    Context,
};
use serde_json::Value;
use std::{borrow::Cow, slice::Iter};
use tracing::{debug, trace};

/// Render a [`Template`] with the given [`Context`].
///
/// Equivalent to [`Template::render`].
///
/// # Errors
///
/// Returns a [`RenderError`] when an expression cannot be evaluated, in
/// which case no output is produced.
///
/// # Examples
///
/// ```
/// use hashblock::{compile, render, Context};
/// use serde_json::json;
///
/// let template = compile("Before##=value##\n##if cond##After\n##/##").unwrap();
/// let context = Context::try_from(json!({ "value": "<3", "cond": true })).unwrap();
///
/// assert_eq!(render(&template, &context).unwrap(), "Before&lt;3\nAfter\n");
/// ```
pub fn render(template: &Template, context: &Context) -> Result<String, RenderError> {
    template.render(context)
}

/// Walks the tree of a [`Template`], writing the output to a buffer.
///
/// Output is only returned once the whole tree has been rendered, so a
/// failure never exposes partial output.
///
/// Open blocks are tracked on an explicit stack of [`Frame`] instances
/// instead of the call stack, so the depth of nesting is limited only by
/// memory.
pub struct Renderer<'template> {
    /// The template being rendered.
    template: &'template Template,
}

impl<'template> Renderer<'template> {
    /// Create a new Renderer.
    #[inline]
    pub fn new(template: &'template Template) -> Self {
        Self { template }
    }

    /// Render the Template stored inside the Renderer.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] describing the first expression that could
    /// not be evaluated.
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        let name = self.template.name().unwrap_or("?");
        trace!(template = name, "rendering template");

        let mut buffer = String::with_capacity(self.template.source().len());
        match self.render_scope(self.template.scope(), context, &mut buffer) {
            Ok(()) => Ok(buffer),
            Err(error) => {
                debug!(
                    template = name,
                    line = error.line(),
                    kind = %error.kind(),
                    "render failed"
                );
                Err(error)
            }
        }
    }

    /// Render each Node in the Scope, in order, along with every Scope
    /// nested within it.
    fn render_scope(
        &self,
        scope: &'template Scope,
        context: &dyn Lookup,
        buffer: &mut String,
    ) -> Result<(), RenderError> {
        let mut stack = Stack {
            root: context,
            frames: vec![Frame::new(scope, None)],
        };

        while let Some(frame) = stack.frames.last_mut() {
            let Some(node) = frame.nodes.next() else {
                if let Some(frame) = stack.frames.pop() {
                    stack.advance(frame);
                }
                continue;
            };

            match node {
                Node::Text(region) => buffer.push_str(region.literal(self.template.source())),
                Node::Output(output) => {
                    let value = self.evaluate(output.expression, &stack)?;
                    // Writing into a String cannot fail.
                    let _ = Pipe::new(buffer).write_escaped(&value);
                }
                Node::If(block) => {
                    let branch = if is_truthy(&self.evaluate(block.condition, &stack)?) {
                        &block.then_branch
                    } else {
                        &block.else_branch
                    };

                    stack.frames.push(Frame::new(branch, None));
                }
                Node::Each(block) => {
                    let frame = self.begin_each(block, &stack)?;
                    stack.frames.push(frame);
                }
            }
        }

        Ok(())
    }

    /// Evaluate the collection of an Each, returning the Frame that renders
    /// its first item.
    ///
    /// The alternate branch is rendered with the enclosing context when the
    /// collection is empty.
    fn begin_each(
        &self,
        block: &'template Each,
        stack: &Stack<'template, '_>,
    ) -> Result<Frame<'template>, RenderError> {
        let items = match self.evaluate(block.items, stack)?.into_owned() {
            Value::Array(items) => items,
            other => {
                let length = block.items.literal(self.template.source()).len();
                let error = EvaluateError::new(EvaluateErrorKind::NotIterable, 0..length)
                    .with_help(format!(
                        "expected an array to iterate over, found {}",
                        type_name(&other)
                    ));

                return Err(self.error(error, block.items));
            }
        };

        if items.is_empty() {
            return Ok(Frame::new(&block.else_branch, None));
        }

        let iteration = Iteration {
            block,
            name: block.binding.literal(self.template.source()),
            items,
            index: 0,
        };

        Ok(Frame::new(&block.body, Some(iteration)))
    }

    /// Evaluate the expression located at the given Region.
    fn evaluate<'context>(
        &self,
        expression: Region,
        context: &'context dyn Lookup,
    ) -> Result<Cow<'context, Value>, RenderError> {
        evaluate_in(expression.literal(self.template.source()), context)
            .map_err(|error| self.error(error, expression))
    }

    /// Position an [`EvaluateError`] within the template source.
    fn error(&self, error: EvaluateError, expression: Region) -> RenderError {
        RenderError::from_evaluate(
            error,
            self.template.source(),
            expression,
            self.template.name(),
        )
    }
}

/// A Scope that is being rendered.
struct Frame<'template> {
    /// The Node instances of the Scope that have not been rendered yet.
    nodes: Iter<'template, Node>,
    /// Present when the Scope is the body of an Each.
    iteration: Option<Iteration<'template>>,
}

impl<'template> Frame<'template> {
    fn new(scope: &'template Scope, iteration: Option<Iteration<'template>>) -> Self {
        Self {
            nodes: scope.data.iter(),
            iteration,
        }
    }
}

/// The progress of an Each through its collection.
struct Iteration<'template> {
    block: &'template Each,
    /// The binding name.
    name: &'template str,
    items: Vec<Value>,
    /// Position of the item that is currently bound.
    index: usize,
}

/// The open Frame instances, layered over the Context given to the render.
struct Stack<'template, 'context> {
    root: &'context dyn Lookup,
    frames: Vec<Frame<'template>>,
}

impl<'template> Stack<'template, '_> {
    /// Handle a Frame whose Scope has been fully rendered.
    ///
    /// The body of an Each is rendered again while items remain.
    fn advance(&mut self, frame: Frame<'template>) {
        let Some(mut iteration) = frame.iteration else {
            return;
        };

        iteration.index += 1;
        if iteration.index < iteration.items.len() {
            let block = iteration.block;
            self.frames.push(Frame::new(&block.body, Some(iteration)));
        }
    }
}

impl Lookup for Stack<'_, '_> {
    /// The innermost binding of the name wins, so a binding shadows the
    /// Context and any enclosing binding of the same name.
    fn lookup(&self, name: &str) -> Option<&Value> {
        let bound = self
            .frames
            .iter()
            .rev()
            .filter_map(|frame| frame.iteration.as_ref())
            .find(|iteration| iteration.name == name);

        match bound {
            Some(iteration) => iteration.items.get(iteration.index),
            None => self.root.lookup(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::{compile, log::EvaluateErrorKind, Context};
    use serde_json::{json, Value};

    fn render_with(source: &str, context: Value) -> String {
        let template = compile(source).unwrap();
        render(&template, &Context::try_from(context).unwrap()).unwrap()
    }

    #[test]
    fn test_render_escaped_output() {
        let source = "Before##=value##\n##if cond##After\n##/##";

        assert_eq!(
            render_with(source, json!({ "value": "<3", "cond": true })),
            "Before&lt;3\nAfter\n"
        );
        assert_eq!(
            render_with(source, json!({ "value": "\"hey\"", "cond": false })),
            "Before&quot;hey&quot;\n\n"
        );
    }

    #[test]
    fn test_render_if_else() {
        let source = "##if lat > 34##north##else##south##/##";

        assert_eq!(render_with(source, json!({ "lat": 34.5 })), "north");
        assert_eq!(render_with(source, json!({ "lat": 33 })), "south");
        assert_eq!(render_with("##if n##yes##/##", json!({ "n": 0 })), "");
    }

    #[test]
    fn test_render_each() {
        let source = "<ul>##each items as item##<li>##=item##</li>##/##</ul>";

        assert_eq!(
            render_with(source, json!({ "items": ["a", "<b>", 3] })),
            "<ul><li>a</li><li>&lt;b&gt;</li><li>3</li></ul>"
        );
    }

    #[test]
    fn test_render_each_else() {
        let source = "##each items as item####=item####else##none near ##=lat####/##";

        assert_eq!(
            render_with(source, json!({ "items": [], "lat": 34 })),
            "none near 34"
        );
    }

    #[test]
    fn test_render_each_nested() {
        let source = "##each rows as row####each row as cell####=cell####/##;##/##";

        assert_eq!(
            render_with(source, json!({ "rows": [[1, 2], [3]] })),
            "12;3;"
        );
    }

    #[test]
    fn test_binding_does_not_leak() {
        let template = compile("##each items as item####=item####/####=item##").unwrap();
        let context = Context::new().with_value("items", json!([1, 2]));
        let error = template.render(&context).unwrap_err();

        assert_eq!(error.kind(), EvaluateErrorKind::UndefinedReference);
        assert_eq!(context.get("item"), None);
    }

    #[test]
    fn test_binding_shadows_outer_name() {
        let source = "##each items as name####=name####/##,##=name##";

        assert_eq!(
            render_with(source, json!({ "items": ["a", "b"], "name": "outer" })),
            "ab,outer"
        );
    }

    #[test]
    fn test_render_not_iterable() {
        let template = compile("\n##each count as n##x##/##").unwrap();
        let context = Context::new().with_value("count", json!(3));
        let error = template.render(&context).unwrap_err();

        assert_eq!(error.kind(), EvaluateErrorKind::NotIterable);
        assert_eq!(error.line(), 2);
    }

    #[test]
    fn test_render_error_line() {
        let template = compile("a\nb\n##if ok##\n##=missing.title##\n##/##").unwrap();
        let context = Context::new().with_value("ok", json!(true));
        let error = template.render(&context).unwrap_err();

        assert_eq!(error.kind(), EvaluateErrorKind::UndefinedReference);
        assert_eq!(error.line(), 4);
        assert_eq!(
            error.to_string(),
            "undefined_reference at line 4: `missing` is not defined"
        );
    }

    #[test]
    fn test_render_deep_nesting() {
        let depth = 100_000;
        let source = format!("{}x{}", "##if a##".repeat(depth), "##/##".repeat(depth));

        assert_eq!(render_with(&source, json!({ "a": true })), "x");
        assert_eq!(render_with(&source, json!({ "a": false })), "");
    }

    #[test]
    fn test_render_deep_each() {
        let depth = 1_000;
        let source = format!(
            "{}##=x##{}",
            "##each xs as x##".repeat(depth),
            "##/##".repeat(depth)
        );

        assert_eq!(render_with(&source, json!({ "xs": [7] })), "7");
        assert_eq!(render_with(&source, json!({ "xs": [] })), "");
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = compile("##each xs as x####=x * 2##,##/##").unwrap();
        let context = Context::new().with_value("xs", json!([1, 2, 3]));

        let first = template.render(&context).unwrap();
        assert_eq!(first, "2,4,6,");
        assert_eq!(template.render(&context).unwrap(), first);
    }

    #[test]
    fn test_render_concurrently() {
        let template = compile("##each xs as x####=x + offset####/##").unwrap();

        std::thread::scope(|scope| {
            for offset in 0..4 {
                let template = &template;
                scope.spawn(move || {
                    let context = Context::new()
                        .with_value("xs", json!([1, 2]))
                        .with_value("offset", json!(offset * 10));
                    let expect = format!("{}{}", 1 + offset * 10, 2 + offset * 10);

                    for _ in 0..100 {
                        assert_eq!(template.render(&context).unwrap(), expect);
                    }
                });
            }
        });
    }
}
