/// Integration tests for the local execution path
///
/// These tests spawn real interpreters:
/// 1. `sh` based tests exercise piping, exit codes and ordering on unix
/// 2. Python based tests run the documented end-to-end scenarios and are
///    ignored by default because they need `python3` on PATH

#[cfg(test)]
mod local_engine_tests {
    use crate::classifier::classify;
    use crate::config::InterpreterConfig;
    use crate::engine::LocalEngine;
    use crate::executor::{run_test, run_tests};
    use crate::reporter::Reporter;
    use clue_common::types::{ExecutionMode, SolutionSource, TestCase, TestSet};
    use clue_common::{ErrorKind, HarnessError};
    use std::collections::BTreeMap;

    fn make_engine(command: &str) -> LocalEngine {
        LocalEngine::new(InterpreterConfig {
            command: command.to_string(),
            args: vec!["-c".to_string()],
            env: BTreeMap::new(),
        })
    }

    fn make_test_case(id: u32, stimulus: &str, expected_output: &str) -> TestCase {
        TestCase {
            id,
            stimulus: stimulus.to_string(),
            expected_output: expected_output.to_string(),
        }
    }

    /// Test: stdin-mode program reads its stimulus
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_stdin_feed() {
        let engine = make_engine("sh");
        let solution = SolutionSource::new("read a; read b; echo $((a + b))");
        let case = make_test_case(1, "3\n4\n", "7");

        let result = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert!(result.passed, "observed: {:?}", result.observed_output);
        assert_eq!(result.observed_output, "7");
    }

    /// Test: code-mode stimulus is appended after the solution
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_code_append() {
        let engine = make_engine("sh");
        let solution = SolutionSource::new("add() { echo $(($1 + $2)); }");
        let case = make_test_case(1, "add 2 3", "5");

        let result = run_test(&engine, &solution, &case, ExecutionMode::CodeAppend)
            .await
            .unwrap();

        assert!(result.passed);
    }

    /// Test: non-zero exit compares stderr instead of stdout
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_failure_reports_stderr() {
        let engine = make_engine("sh");
        let solution = SolutionSource::new("echo partial; echo boom >&2; exit 3");
        let case = make_test_case(1, "", "partial");

        let result = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert!(!result.passed);
        assert_eq!(result.observed_output, "boom");
    }

    /// Test: the configured environment reaches the program
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_extra_environment() {
        let engine = LocalEngine::new(InterpreterConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string()],
            env: BTreeMap::from([("PYTHONIOENCODING".to_string(), "utf-8".to_string())]),
        });

        let output = engine.execute("echo $PYTHONIOENCODING", None).await.unwrap();

        assert_eq!(output.stdout, "utf-8\n");
        assert!(output.success());
    }

    /// Test: code mode closes standard input instead of inheriting it
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_no_stdin_in_code_mode() {
        let engine = make_engine("sh");

        let output = engine
            .execute("if read line; then echo got; else echo eof; fi", None)
            .await
            .unwrap();

        assert_eq!(output.stdout, "eof\n");
    }

    /// Test: a program that ignores a large input does not stall the run
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_unread_input() {
        let engine = make_engine("sh");
        let input = "x".repeat(1024 * 1024);

        let output = engine.execute("echo done", Some(&input)).await.unwrap();

        assert_eq!(output.stdout, "done\n");
    }

    /// Test: same program, same observed output
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sh_idempotent() {
        let engine = make_engine("sh");
        let solution = SolutionSource::new("read n; echo $((n * n))");
        let case = make_test_case(1, "12", "144");

        let first = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();
        let second = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert_eq!(first.observed_output, second.observed_output);
        assert_eq!(first.passed, second.passed);
    }

    /// Test: parallel runs still report in test-set order
    #[cfg(unix)]
    #[tokio::test]
    async fn test_parallel_report_order() {
        let engine = make_engine("sh");
        let solution = SolutionSource::new("read d; sleep \"$d\"; echo \"$d\"");
        let mut tests = TestSet::new();
        tests.insert(1, "0.4".to_string(), "0.4".to_string());
        tests.insert(2, "0".to_string(), "0".to_string());
        tests.insert(3, "0.1".to_string(), "wrong".to_string());

        let mut reporter = Reporter::new(Vec::new(), 20);
        let summary = run_tests(
            &engine,
            &solution,
            &tests,
            ExecutionMode::StdinFeed,
            3,
            &mut reporter,
        )
        .await
        .unwrap();

        assert_eq!((summary.passed, summary.total), (2, 3));

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let first = text.find("Test 1 completed!").unwrap();
        let second = text.find("Test 2 completed!").unwrap();
        let third = text.find("Test 3 failed!").unwrap();
        assert!(first < second && second < third);
        assert!(text.contains("Tests passed: 2/3"));
    }

    /// Test: a missing interpreter aborts with an environment error
    #[tokio::test]
    async fn test_missing_interpreter() {
        let engine = make_engine("clue-runner-no-such-interpreter");
        let solution = SolutionSource::new("print(1)");
        let case = make_test_case(1, "", "1");

        let err = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::InterpreterSpawn { .. }));
        assert_eq!(err.kind(), ErrorKind::Environment);
    }

    /// Test: the run stops at the first interpreter failure
    #[tokio::test]
    async fn test_missing_interpreter_aborts_run() {
        let engine = make_engine("clue-runner-no-such-interpreter");
        let solution = SolutionSource::new("print(1)");
        let mut tests = TestSet::new();
        tests.insert(1, "a".to_string(), "1".to_string());
        tests.insert(2, "b".to_string(), "1".to_string());

        let mut reporter = Reporter::new(Vec::new(), 20);
        let err = run_tests(
            &engine,
            &solution,
            &tests,
            ExecutionMode::StdinFeed,
            1,
            &mut reporter,
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<HarnessError>().is_some());
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!text.contains("Tests passed"));
    }

    /// Test: `print(1+1)` fed an empty stdin prints 2
    #[tokio::test]
    #[ignore] // Requires python3
    async fn test_python_stdin_scenario() {
        let engine = LocalEngine::new(InterpreterConfig {
            command: "python3".to_string(),
            ..InterpreterConfig::default()
        });
        let solution = SolutionSource::new("print(1+1)");
        let case = make_test_case(1, "", "2");

        let result = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert!(result.passed);
        assert_eq!(result.observed_output, "2");
    }

    /// Test: a function call stimulus is classified as code and passes
    #[tokio::test]
    #[ignore] // Requires python3
    async fn test_python_code_scenario() {
        let engine = LocalEngine::new(InterpreterConfig {
            command: "python3".to_string(),
            ..InterpreterConfig::default()
        });
        let solution = SolutionSource::new("def add(a,b): return a+b");
        let case = make_test_case(1, "print(add(2,3))", "5");

        let mode = classify(solution.as_str(), &case.stimulus);
        assert_eq!(mode, ExecutionMode::CodeAppend);

        let result = run_test(&engine, &solution, &case, mode).await.unwrap();

        assert!(result.passed);
    }

    /// Test: a traceback becomes the observed output
    #[tokio::test]
    #[ignore] // Requires python3
    async fn test_python_exception_output() {
        let engine = LocalEngine::new(InterpreterConfig {
            command: "python3".to_string(),
            ..InterpreterConfig::default()
        });
        let solution = SolutionSource::new("print(1 // int(input()))");
        let case = make_test_case(1, "0", "0");

        let result = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert!(!result.passed);
        assert!(result
            .observed_output
            .ends_with("ZeroDivisionError: integer division or modulo by zero"));
    }

    /// Test: non-ASCII output survives regardless of host locale
    #[tokio::test]
    #[ignore] // Requires python3
    async fn test_python_utf8_output() {
        let engine = LocalEngine::new(InterpreterConfig {
            command: "python3".to_string(),
            ..InterpreterConfig::default()
        });
        let solution = SolutionSource::new("print(input()[::-1])");
        let case = make_test_case(1, "żółw", "włóż");

        let result = run_test(&engine, &solution, &case, ExecutionMode::StdinFeed)
            .await
            .unwrap();

        assert!(result.passed, "observed: {:?}", result.observed_output);
    }
}
