//! Integration tests for Weft core
//!
//! Exercises the kernel end to end: templates calling native and semantic
//! functions, planner answers turned into plans, and plans that fail or are
//! persisted and resumed.

use async_trait::async_trait;
use std::sync::Arc;
use weft_core::{
    CompletionSettings, ContextVariables, EngineConfig, Function, Kernel, NativeFunction, Plan,
    TextCompletion, WeftError, WeftResult, parse_action_plan,
};

/// Completion backend that answers with the prompt it was given
struct EchoCompletion;

#[async_trait]
impl TextCompletion for EchoCompletion {
    async fn complete(&self, prompt: &str, _settings: &CompletionSettings) -> WeftResult<String> {
        Ok(prompt.to_string())
    }
}

fn native<F>(skill: &str, name: &str, f: F) -> Arc<dyn Function>
where
    F: Fn(&mut ContextVariables) -> WeftResult<String> + Send + Sync + 'static,
{
    Arc::new(NativeFunction::from_fn(skill, name, format!("Run {}", name), f))
}

fn kernel() -> Kernel {
    let mut kernel = Kernel::with_completion(EngineConfig::default(), Arc::new(EchoCompletion));
    kernel.register_function(native("text", "upper", |vars| {
        Ok(vars.input().to_uppercase())
    }));
    kernel.register_function(native("text", "exclaim", |vars| {
        Ok(format!("{}!", vars.input()))
    }));
    kernel.register_function(native("math", "fail", |_| {
        Err(WeftError::invocation("math.fail", "boom"))
    }));
    kernel
}

fn step(kernel: &Kernel, skill: &str, name: &str) -> Plan {
    let function = kernel
        .function(Some(skill), name)
        .expect("function is registered");
    Plan::from_function(function)
}

#[tokio::test]
async fn test_template_calls_semantic_function_calling_native_function() -> WeftResult<()> {
    let mut kernel = kernel();
    kernel.register_semantic_function(
        "writer",
        "greet",
        "Hello {{$input}}, from {{text.upper $team}}",
        "Greets someone on behalf of a team",
    )?;

    let mut variables = ContextVariables::new();
    variables.set("name", "ada").set("team", "weft");

    let rendered = kernel
        .render("<{{writer.greet $name}}>", &variables)
        .await?;

    assert_eq!(rendered, "<Hello ada, from WEFT>");
    Ok(())
}

#[tokio::test]
async fn test_template_with_unknown_function_fails_without_output() {
    let kernel = kernel();

    let error = kernel
        .render("before {{text.missing}} after", &ContextVariables::new())
        .await
        .expect_err("unknown function must fail the render");

    assert!(matches!(error, WeftError::FunctionNotFound { .. }));
}

#[tokio::test]
async fn test_planner_answer_runs_through_kernel() -> WeftResult<()> {
    let kernel = kernel();
    let answer = r#"Sure, here is the plan:
        {"plan":{"rationale":"shout the topic","function":"text.upper","parameters":{"input":"$topic"}}}
        Good luck!"#;

    let mut plan = parse_action_plan("Shout the topic", answer, kernel.functions())?;
    assert_eq!(plan.steps().len(), 1);

    let mut variables = ContextVariables::new();
    variables.set("topic", "rust");
    let result = kernel.run_plan(&mut plan, variables).await?;

    assert_eq!(result.result(), "RUST");
    assert!(!plan.has_next_step());
    Ok(())
}

#[tokio::test]
async fn test_failed_step_stops_the_plan() {
    let kernel = kernel();
    let mut plan = Plan::with_steps(
        "Shout then fail",
        vec![step(&kernel, "text", "upper"), step(&kernel, "math", "fail")],
    );

    let error = kernel
        .run_plan(&mut plan, ContextVariables::with_input("hi"))
        .await
        .expect_err("second step fails");

    assert!(matches!(&error, WeftError::PlanStep { step, .. } if step == "math.fail"));
    assert!(matches!(error.root_cause(), WeftError::Invocation { .. }));
    assert_eq!(plan.next_step_index(), 1);
    assert_eq!(plan.state.input(), "HI");
}

#[tokio::test]
async fn test_persisted_plan_resumes_where_it_stopped() -> WeftResult<()> {
    let kernel = kernel();
    let mut plan = Plan::with_steps(
        "Shout and exclaim",
        vec![step(&kernel, "text", "upper"), step(&kernel, "text", "exclaim")],
    );

    let context = kernel.create_context(ContextVariables::with_input("hi"));
    plan.run_next_step(&context).await?;
    assert_eq!(plan.next_step_index(), 1);

    let json = plan.to_json(true)?;
    let mut restored = Plan::from_json(&json, Some(kernel.functions().as_ref()))?;
    assert_eq!(restored.next_step_index(), 1);

    let result = kernel.run_plan(&mut restored, ContextVariables::new()).await?;

    assert_eq!(result.result(), "HI!");
    assert!(!restored.has_next_step());
    Ok(())
}

#[tokio::test]
async fn test_named_plan_is_callable_from_templates() -> WeftResult<()> {
    let mut kernel = kernel();
    let shout = Plan::with_steps(
        "Shout and exclaim",
        vec![step(&kernel, "text", "upper"), step(&kernel, "text", "exclaim")],
    )
    .with_name("flows", "shout");
    kernel.register_function(Arc::new(shout));

    let mut variables = ContextVariables::new();
    variables.set("word", "go");
    let rendered = kernel.render("{{flows.shout $word}} now", &variables).await?;

    assert_eq!(rendered, "GO! now");
    Ok(())
}
