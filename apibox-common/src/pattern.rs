//! URI 模式编译
//!
//! 声明的 URI 按 `/` 拆分，空段丢弃。被圆括号包住的段是捕获段，
//! 括号内的内容作为正则；其余是字面段。字面段用 `.` 连接成方法路径，
//! 捕获段在模板中以 `{}` 占位。
//!
//! ```text
//! /get/(\w+)/wtf  =>  method_path = "get.wtf", uri_template = "/get/{}/wtf"
//! ```

use regex::Regex;

use crate::error::{ApiError, Result};
use crate::types::EndpointDeclaration;

/// URI 中的一段
#[derive(Debug, Clone)]
enum UriSegment {
    Literal(String),
    Capture(usize),
}

/// 捕获段：原始正则文本加上整段匹配用的编译结果
#[derive(Debug, Clone)]
pub struct CapturePattern {
    pub pattern: String,
    matcher: Regex,
}

impl CapturePattern {
    fn compile(pattern: &str, uri: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(ApiError::configuration(format!(
                "empty capture segment in `{uri}`"
            )));
        }
        let matcher = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            ApiError::configuration(format!(
                "invalid capture pattern `{pattern}` in `{uri}`: {e}"
            ))
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// 整段匹配
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }
}

/// 单个 URI 的编译结果
#[derive(Debug, Clone)]
pub struct CompiledUri {
    pub method_path: String,
    pub uri_template: String,
    pub captures: Vec<CapturePattern>,
    segments: Vec<UriSegment>,
}

/// 编译一个声明的 URI
pub fn compile_uri(uri: &str) -> Result<CompiledUri> {
    let mut literals = Vec::new();
    let mut template = Vec::new();
    let mut captures = Vec::new();
    let mut segments = Vec::new();

    for segment in uri.split('/').filter(|s| !s.is_empty()) {
        if segment.len() >= 2 && segment.starts_with('(') && segment.ends_with(')') {
            captures.push(CapturePattern::compile(&segment[1..segment.len() - 1], uri)?);
            segments.push(UriSegment::Capture(captures.len() - 1));
            template.push("{}");
        } else {
            literals.push(segment);
            segments.push(UriSegment::Literal(segment.to_string()));
            template.push(segment);
        }
    }

    if literals.is_empty() {
        return Err(ApiError::configuration(format!(
            "`{uri}` has no literal segment to name it by"
        )));
    }

    Ok(CompiledUri {
        method_path: literals.join("."),
        uri_template: format!("/{}", template.join("/")),
        captures,
        segments,
    })
}

/// 编译后的端点定义
#[derive(Debug, Clone)]
pub struct CompiledMethodDef {
    /// 声明时的原始 URI
    pub uri: String,
    pub method_path: String,
    pub uri_template: String,
    pub capture_patterns: Vec<CapturePattern>,
    pub options: EndpointDeclaration,
    segments: Vec<UriSegment>,
}

impl CompiledMethodDef {
    pub fn new(uri: &str, options: EndpointDeclaration) -> Result<Self> {
        let compiled = compile_uri(uri)?;
        Ok(Self {
            uri: uri.to_string(),
            method_path: compiled.method_path,
            uri_template: compiled.uri_template,
            capture_patterns: compiled.captures,
            options,
            segments: compiled.segments,
        })
    }

    /// 校验位置参数并代入模板，得到最终路径
    pub fn materialize(&self, args: &[String]) -> Result<String> {
        if args.len() != self.capture_patterns.len() {
            return Err(ApiError::ArgumentCountMismatch {
                method_path: self.method_path.clone(),
                expected: self.capture_patterns.len(),
                actual: args.len(),
            });
        }

        for (index, (value, capture)) in args.iter().zip(&self.capture_patterns).enumerate() {
            if !capture.is_match(value) {
                return Err(ApiError::ArgumentPatternMismatch {
                    index,
                    value: value.clone(),
                    pattern: capture.pattern.clone(),
                });
            }
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                UriSegment::Literal(text) => path.push_str(text),
                UriSegment::Capture(index) => path.push_str(&args[*index]),
            }
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_compile_literal_uri() {
        let compiled = compile_uri("/posts/all").unwrap();
        assert_eq!(compiled.method_path, "posts.all");
        assert_eq!(compiled.uri_template, "/posts/all");
        assert!(compiled.captures.is_empty());
    }

    #[test]
    fn test_compile_capture_uri() {
        let compiled = compile_uri(r"/get/(\w+)/wtf").unwrap();
        assert_eq!(compiled.method_path, "get.wtf");
        assert_eq!(compiled.uri_template, "/get/{}/wtf");
        assert_eq!(compiled.captures.len(), 1);
        assert_eq!(compiled.captures[0].pattern, r"\w+");
    }

    #[test]
    fn test_empty_segments_are_dropped() {
        let compiled = compile_uri("//users///(\\d+)/").unwrap();
        assert_eq!(compiled.method_path, "users");
        assert_eq!(compiled.uri_template, "/users/{}");
    }

    #[test]
    fn test_invalid_capture_pattern() {
        let result = compile_uri("/users/([0-9)");
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_capture_only_uri_is_rejected() {
        assert!(compile_uri(r"/(\d+)").is_err());
        assert!(compile_uri("/").is_err());
        assert!(compile_uri("/users/()").is_err());
    }

    #[test]
    fn test_materialize() {
        let def = CompiledMethodDef::new(r"/get/(\w+)/wtf", EndpointDeclaration::get()).unwrap();
        assert_eq!(def.materialize(&args(&["hello"])).unwrap(), "/get/hello/wtf");
    }

    #[test]
    fn test_materialize_argument_count() {
        let def = CompiledMethodDef::new(r"/repos/(\w+)/(\w+)", EndpointDeclaration::get()).unwrap();

        let err = def.materialize(&args(&["reorx"])).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ArgumentCountMismatch { expected: 2, actual: 1, .. }
        ));

        let err = def.materialize(&args(&["a", "b", "c"])).unwrap_err();
        assert!(matches!(
            err,
            ApiError::ArgumentCountMismatch { expected: 2, actual: 3, .. }
        ));
    }

    #[test]
    fn test_materialize_pattern_is_anchored() {
        let def = CompiledMethodDef::new(r"/delay/(\d)", EndpointDeclaration::get()).unwrap();
        assert_eq!(def.materialize(&args(&["3"])).unwrap(), "/delay/3");

        match def.materialize(&args(&["30"])).unwrap_err() {
            ApiError::ArgumentPatternMismatch { index, value, pattern } => {
                assert_eq!(index, 0);
                assert_eq!(value, "30");
                assert_eq!(pattern, r"\d");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
