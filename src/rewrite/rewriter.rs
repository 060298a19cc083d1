use super::environment::DependencyEnvironment;
use crate::sleigh::ConstructorMatch;

/// Replacement text for a constructor that received at least one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenConstructor {
    pub text: String,
    pub claims_inserted: usize,
}

/// Splices claims in front of every semantics statement that references a registered name.
///
/// Returns `None` when no statement referenced anything, so the caller can keep the original
/// text untouched. Rewritten statements lose their surrounding whitespace and are emitted one per
/// line after the opening brace, indented like the first original statement.
pub fn rewrite_constructor(
    env: &DependencyEnvironment<'_>,
    constructor: &ConstructorMatch<'_>,
) -> Option<RewrittenConstructor> {
    let mut pieces: Vec<&str> = constructor.semantics().split(';').collect();
    // Only whitespace follows the last `;`; it decides where the closing brace sits.
    let tail = pieces.pop().unwrap_or_default();

    let mut lines: Vec<&str> = Vec::new();
    let mut claims_inserted = 0usize;
    for statement in pieces {
        for claim in env.priors_for(statement) {
            lines.extend(claim.split(";\n"));
            claims_inserted += 1;
        }
        lines.push(statement.trim());
    }

    if claims_inserted == 0 {
        return None;
    }

    let before = constructor.before_semantics();
    let opening = before.trim_end();
    let indent = statement_indent(&before[opening.len()..], constructor.semantics());
    let closing_indent = tail.rfind('\n').map_or("", |idx| &tail[idx + 1..]);

    let capacity = constructor.as_str().len() + lines.len() * (indent.len() + 32);
    let mut text = String::with_capacity(capacity);
    text.push_str(opening);
    text.push('\n');
    for line in &lines {
        text.push_str(&indent);
        text.push_str(line);
        text.push_str(";\n");
    }
    text.push_str(closing_indent);
    text.push_str(constructor.after_semantics());
    Some(RewrittenConstructor {
        text,
        claims_inserted,
    })
}

/// Horizontal whitespace between the last line break after `{` and the first statement.
///
/// Blocks written on a single line have no indentation.
fn statement_indent(after_brace: &str, semantics: &str) -> String {
    let leading = &semantics[..semantics.len() - semantics.trim_start().len()];
    let gap = format!("{after_brace}{leading}");
    gap.rfind('\n').map_or_else(String::new, |idx| gap[idx + 1..].to_string())
}

#[cfg(test)]
mod tests {
    use super::rewrite_constructor;
    use crate::rewrite::config::RewriteConfig;
    use crate::rewrite::environment::DependencyEnvironment;
    use crate::sleigh::find_constructor;

    fn config() -> RewriteConfig {
        RewriteConfig::new("4:4").with_program_counter("PC")
    }

    #[test]
    fn inserts_claim_before_referencing_statement() {
        let config = config();
        let src = "foo: \"op\" is imm [ x=inst_next+2; ] { result=x; }";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let rewritten = rewrite_constructor(&env, &constructor).expect("rewritten");
        assert_eq!(rewritten.claims_inserted, 1);
        assert_eq!(
            rewritten.text,
            "foo: \"op\" is imm [ x=inst_next+2; ] {\n\
             remill_tmp:4:4=x;\nclaim_eq(remill_tmp,PC+2);\nresult=x;\n}"
        );
    }

    #[test]
    fn claims_repeat_for_every_referencing_statement() {
        let config = config();
        let src = "b: rel is off [ dest=inst_next+off; ] { tmp=dest; goto [dest]; r0=1; }";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let rewritten = rewrite_constructor(&env, &constructor).expect("rewritten");
        assert_eq!(rewritten.claims_inserted, 2);
        let claim = "remill_tmp:4:4=dest;\nclaim_eq(remill_tmp,PC+off)";
        let expected_body = format!("{claim};\ntmp=dest;\n{claim};\ngoto [dest];\nr0=1;\n");
        assert!(rewritten.text.ends_with(&format!("{{\n{expected_body}}}")));
    }

    #[test]
    fn unreferenced_names_leave_constructor_alone() {
        let config = config();
        let src = "b: rel is off [ dest=inst_next+off; ] { r0=r1; }";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }
        assert!(env.has_derived());
        assert!(rewrite_constructor(&env, &constructor).is_none());
    }

    #[test]
    fn baseline_marker_is_claimed_when_referenced() {
        let config = config();
        let src = "c: rel is off [ d=inst_next; ] { ret=inst_next; }";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let rewritten = rewrite_constructor(&env, &constructor).expect("rewritten");
        assert_eq!(rewritten.claims_inserted, 1);
        assert!(
            rewritten
                .text
                .contains("remill_tmp:4:4=inst_next;\nclaim_eq(remill_tmp,PC);\nret=inst_next;")
        );
    }

    #[test]
    fn multi_line_blocks_keep_their_indentation() {
        let config = config();
        let src = "j: rel is off [ d=inst_next+4; ]\n{\n    r0 = 1;\n    goto d;\n}\n";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let rewritten = rewrite_constructor(&env, &constructor).expect("rewritten");
        assert_eq!(
            rewritten.text,
            "j: rel is off [ d=inst_next+4; ]\n{\n    r0 = 1;\n    remill_tmp:4:4=d;\n    \
             claim_eq(remill_tmp,PC+4);\n    goto d;\n}\n"
        );
        assert!(!rewritten.text.contains("{\n \n"));
    }

    #[test]
    fn tab_indented_closing_brace_is_kept() {
        let config = config();
        let src = "k: rel is off [ d=inst_next; ] {\n\t\tcall [d];\n\t}";
        let constructor = find_constructor(src, 0).expect("constructor");
        let mut env = DependencyEnvironment::new(&config);
        for statement in constructor.action_statements() {
            env.register(statement);
        }

        let rewritten = rewrite_constructor(&env, &constructor).expect("rewritten");
        assert_eq!(
            rewritten.text,
            "k: rel is off [ d=inst_next; ] {\n\t\tremill_tmp:4:4=d;\n\t\t\
             claim_eq(remill_tmp,PC);\n\t\tcall [d];\n\t}"
        );
    }
}
