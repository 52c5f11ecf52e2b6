use std::path::Path;

use cilocal_core::CompilerConfig;
use cilocal_runner::client::{DockerClient, Step, StepError};
use cilocal_runner::docker::{DockerError, ExitInfo};
use cilocal_runner::executor::DockerExecutor;
use mockall::mock;

mock! {
    Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
        async fn exec_interactive(&self, args: &[String]) -> Result<(), DockerError>;
        async fn exec_with_stdin(
            &self,
            args: &[String],
            stdin_data: &[u8],
        ) -> Result<String, DockerError>;
    }
}

fn first_is(args: &[String], expected: &str) -> bool {
    args.first().is_some_and(|a| a == expected)
}

// ── Availability ──

#[tokio::test]
async fn version_is_trimmed() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|args| first_is(args, "--version"))
        .returning(|_| Ok("Docker version 27.3.1, build ce12230\n".to_owned()));

    let client = DockerClient::with_executor(mock);

    assert_eq!(
        client.version().await.as_deref(),
        Some("Docker version 27.3.1, build ce12230")
    );
    assert!(client.is_available().await);
}

#[tokio::test]
async fn missing_binary_is_unavailable() {
    let mut mock = MockExecutor::new();
    mock.expect_exec().returning(|_| {
        Err(DockerError::NotFound {
            binary: "docker".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = DockerClient::with_executor(mock);

    assert!(client.version().await.is_none());
    assert!(!client.is_available().await);
}

// ── Compile ──

#[tokio::test]
async fn compile_pipes_config_to_helper() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_with_stdin()
        .withf(|args, stdin| {
            args.len() == 4
                && args[0] == "run"
                && args[3] == "travis-build:latest"
                && stdin == b"language: go\n".as_slice()
        })
        .times(1)
        .returning(|_, _| Ok("#!/bin/bash\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    let script = client
        .compile_script(&CompilerConfig::default(), b"language: go\n")
        .await
        .unwrap();

    assert_eq!(script, "#!/bin/bash\n");
}

#[tokio::test]
async fn compile_failure_carries_exit_code() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_with_stdin().returning(|args, _| {
        Err(DockerError::CommandFailed {
            args: args.to_vec(),
            exit: ExitInfo::code(1),
            stderr: "yaml parse error".to_owned(),
        })
    });

    let client = DockerClient::with_executor(mock);
    let err = client
        .compile_script(&CompilerConfig::default(), b"::")
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(Step::Compile));
    assert_eq!(err.exit(), Some(ExitInfo::code(1)));
    assert_eq!(err.to_string(), "compile step failed");
}

#[tokio::test]
async fn compile_whitespace_output_is_empty_script() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_with_stdin()
        .returning(|_, _| Ok("  \n\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    let err = client
        .compile_script(&CompilerConfig::default(), b"language: go\n")
        .await
        .unwrap_err();

    assert!(matches!(err, StepError::EmptyScript { .. }));
    assert_eq!(err.step(), Some(Step::Compile));
    assert_eq!(err.exit(), None);
}

// ── Build / Run / Remove ──

#[tokio::test]
async fn build_passes_descriptor_tag_and_context() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_streaming()
        .withf(|args| {
            let expected = [
                "build",
                "--file",
                "/work/.travis.Dockerfile",
                "--tag",
                "cilocal-abc",
                "/work",
            ];
            args.len() == expected.len() && args.iter().zip(expected).all(|(a, e)| a == e)
        })
        .times(1)
        .returning(|_| Ok(()));

    let client = DockerClient::with_executor(mock);
    client
        .build_image(
            Path::new("/work/.travis.Dockerfile"),
            "cilocal-abc",
            Path::new("/work"),
        )
        .await
        .unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn build_rejects_non_utf8_paths() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let mock = MockExecutor::new();
    let client = DockerClient::with_executor(mock);
    let bad = Path::new(OsStr::from_bytes(b"/work/\xff"));

    let err = client
        .build_image(bad, "cilocal-abc", Path::new("/work"))
        .await
        .unwrap_err();

    assert!(matches!(err, StepError::InvalidPath(_)));
}

#[tokio::test]
async fn run_without_tty_is_interactive_only() {
    let mut mock = MockExecutor::new();
    mock.expect_exec_interactive()
        .withf(|args| args.len() == 4 && args[2] == "-i" && args[3] == "cilocal-abc")
        .times(1)
        .returning(|_| Ok(()));

    let client = DockerClient::with_executor(mock);
    client.run_image("cilocal-abc", false).await.unwrap();
}

#[tokio::test]
async fn remove_failure_names_step() {
    let mut mock = MockExecutor::new();
    mock.expect_exec()
        .withf(|args| first_is(args, "rmi"))
        .returning(|args| {
            Err(DockerError::CommandFailed {
                args: args.to_vec(),
                exit: ExitInfo::code(1),
                stderr: "image is being used by running container".to_owned(),
            })
        });

    let client = DockerClient::with_executor(mock);
    let err = client.remove_image("cilocal-abc").await.unwrap_err();

    assert_eq!(err.step(), Some(Step::Remove));
    assert_eq!(err.to_string(), "image removal step failed");
}
