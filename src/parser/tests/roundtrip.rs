//! End-to-end tests: lines -> tokens -> stage chain -> lines.

use std::io::Write;

use dockerfile_parser::{
    lex, parse, parse_text, reconstruct, DockerfileError, InstructionNode, RunCommand, StageNode,
};

fn parse_lines(lines: &[&str]) -> StageNode {
    parse(lex(lines).unwrap())
}

fn round_trip(lines: &[&str]) -> Vec<String> {
    reconstruct(&parse_lines(lines))
}

#[test]
fn test_simple_instructions_round_trip() {
    let input = [
        "FROM golang:1.22 AS build",
        "ARG TARGET=release",
        "ENV CGO_ENABLED=0 GOOS=linux",
        "LABEL maintainer=dev",
        "WORKDIR /src",
        "USER builder",
        "EXPOSE 8080/tcp 53/udp",
        "STOPSIGNAL SIGTERM",
        "MAINTAINER Peter Lustig",
        r#"CMD ["./app","--serve"]"#,
        r#"ENTRYPOINT ["/bin/app"]"#,
        r#"SHELL ["/bin/bash","-c"]"#,
        r#"VOLUME ["/data"]"#,
        "COPY --from=build --chown=app:app /out/app /bin/app",
        "ADD --checksum=sha256:abc https://example.com/a.tgz /tmp/a.tgz",
        r#"RUN --mount=type=cache,target=/root/.cache --network=none ["go","build","./..."]"#,
        r#"HEALTHCHECK --interval=30s --timeout=30s --start-period=0s --start-interval=5s --retries=3 CMD ["curl","-f","localhost"]"#,
        "HEALTHCHECK NONE",
    ];
    assert_eq!(round_trip(&input), input);
}

#[test]
fn test_shell_form_becomes_json() {
    assert_eq!(
        round_trip(&["FROM alpine", "RUN apk add curl", "CMD echo hi"]),
        vec![
            "FROM alpine",
            r#"RUN ["apk","add","curl"]"#,
            r#"CMD ["echo","hi"]"#
        ]
    );
}

#[test]
fn test_stage_naming() {
    let root = parse_lines(&["FROM alpine:3.19 AS base"]);
    let stage = root.next.as_deref().unwrap();
    assert_eq!(stage.name.as_deref(), Some("base"));
    assert_eq!(stage.base_image, "alpine:3.19");
}

#[test]
fn test_cross_stage_reference() {
    let root = parse_lines(&["FROM a AS base", "FROM b AS next", "COPY --from=base ./x ./y"]);
    let base = root.find_stage("base").unwrap();
    let next = root.find_stage("next").unwrap();
    assert!(base.referenced_by.contains(&next.id));
    assert_eq!(base.referenced_by.len(), 1);
}

#[test]
fn test_deterministic_key_ordering() {
    assert_eq!(
        round_trip(&["FROM a", "ARG xy=z abc=def"]),
        vec!["FROM a", "ARG abc=def xy=z"]
    );
}

#[test]
fn test_block_literal_fidelity() {
    let input = [
        "FROM debian",
        "RUN <<EOT",
        "set -ex",
        "apt-get update",
        "  apt-get install -y vim",
        "EOT",
        "USER app",
    ];
    let root = parse_lines(&input);
    let stage = root.next.as_deref().unwrap();
    let InstructionNode::Run(run) = &stage.instructions[0] else {
        panic!("expected RUN");
    };
    let RunCommand::Heredoc { lines, .. } = &run.command else {
        panic!("expected heredoc");
    };
    assert_eq!(
        lines,
        &["EOT", "set -ex", "apt-get update", "apt-get install -y vim", "EOT"]
    );

    assert_eq!(
        reconstruct(&root),
        vec![
            "FROM debian",
            "RUN << EOT",
            "set -ex",
            "apt-get update",
            "apt-get install -y vim",
            "EOT",
            "USER app"
        ]
    );
}

#[test]
fn test_quote_aware_comment_scanning() {
    let tokens = lex(&["RUN echo 'a # b' # trailing"]).unwrap();
    assert_eq!(tokens[0].content, "echo 'a # b'");
    assert_eq!(tokens[0].inline_comment.as_deref(), Some(" trailing"));
}

#[test]
fn test_illegal_keyword() {
    let err = lex(&["BOGUS foo"]).unwrap_err();
    assert!(matches!(
        err,
        DockerfileError::IllegalInstruction { line: 0, ref keyword } if keyword == "BOGUS"
    ));
}

#[test]
fn test_comments_directives_and_blank_lines() {
    let input = [
        "# syntax=docker/dockerfile:1",
        "FROM alpine",
        "# install tools",
        "",
        "RUN apk add git",
    ];
    assert_eq!(
        round_trip(&input),
        vec![
            "# syntax=docker/dockerfile:1",
            "FROM alpine",
            "# install tools",
            "",
            r#"RUN ["apk","add","git"]"#
        ]
    );
}

#[test]
fn test_directive_key_case_kept_and_emitted_after_from() {
    let input = ["FROM alpine", "RUN apk add git", "# NOTE=remember to bump"];
    let root = parse_lines(&input);
    let stage = root.next.as_deref().unwrap();
    assert_eq!(stage.directive("note"), Some("remember to bump"));
    assert_eq!(
        round_trip(&input),
        vec![
            "FROM alpine",
            "# NOTE=remember to bump",
            r#"RUN ["apk","add","git"]"#
        ]
    );
}

#[test]
fn test_strip_tabs_heredoc_round_trip() {
    assert_eq!(
        round_trip(&["FROM alpine", "RUN <<-EOF", "\techo hi", "EOF"]),
        vec!["FROM alpine", "RUN <<- EOF", "echo hi", "EOF"]
    );
    assert_eq!(
        round_trip(&["FROM alpine", "RUN python3 <<-'PY'", "\tprint(1)", "PY"]),
        vec!["FROM alpine", "RUN python3 <<- 'PY'", "print(1)", "PY"]
    );
}

#[test]
fn test_heredoc_after_arithmetic_round_trip() {
    assert_eq!(
        round_trip(&["FROM debian", "RUN echo $((1<<2)) && cat <<EOF", "hello", "EOF"]),
        vec!["FROM debian", "RUN echo $((1<<2)) && cat << EOF", "hello", "EOF"]
    );
}

#[test]
fn test_onbuild_round_trip() {
    assert_eq!(
        round_trip(&["FROM a", "ONBUILD ADD . /app/src", "ONBUILD RUN make"]),
        vec![
            "FROM a",
            "ONBUILD ADD . /app/src",
            r#"ONBUILD RUN ["make"]"#
        ]
    );
}

#[test]
fn test_continuation_lines() {
    assert_eq!(
        round_trip(&["FROM a", "RUN apt-get update && \\", "    apt-get install -y curl"]),
        vec![
            "FROM a",
            r#"RUN ["apt-get","update","&&","apt-get","install","-y","curl"]"#
        ]
    );
}

#[test]
fn test_multi_stage_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "FROM --platform=linux/amd64 golang:1.22 AS build\n\
         WORKDIR /src\n\
         COPY . .\n\
         RUN go build -o /out/app\n\
         \n\
         FROM gcr.io/distroless/static\n\
         COPY --from=build /out/app /app\n\
         ENTRYPOINT [\"/app\"]"
    )
    .unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let root = parse_text(&content).unwrap();
    assert_eq!(root.stage_count(), 3);
    assert_eq!(root.instruction_count(), 6);

    let build = root.find_stage("build").unwrap();
    assert_eq!(build.platform.as_deref(), Some("linux/amd64"));
    assert_eq!(build.referenced_by.len(), 1);

    assert_eq!(
        reconstruct(&root),
        vec![
            "FROM --platform=linux/amd64 golang:1.22 AS build",
            "WORKDIR /src",
            "COPY . .",
            r#"RUN ["go","build","-o","/out/app"]"#,
            "",
            "FROM gcr.io/distroless/static",
            "COPY --from=build /out/app /app",
            r#"ENTRYPOINT ["/app"]"#
        ]
    );
}
