//! Bluespec SystemVerilog grammar rules

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::grammar::rules::{
    Rule, choice, comma_sep1, optional, prec, prec_left, prec_right, repeat, seq, string, sym,
};

/// Operator binding strength, tightest first
mod precedence {
    pub const PARENT: i32 = 37;
    pub const UNARY: i32 = 36;
    pub const TAGGED: i32 = 35;
    pub const MUL: i32 = 34;
    pub const ADD: i32 = 33;
    pub const SHIFT: i32 = 32;
    pub const RELATIONAL: i32 = 31;
    pub const EQUAL: i32 = 30;
    pub const AND: i32 = 29;
    pub const XOR: i32 = 28;
    pub const XNOR: i32 = 27;
    pub const OR: i32 = 26;
    pub const LOGICAL_AND: i32 = 25;
    pub const LOGICAL_OR: i32 = 24;
    pub const CONDITIONAL: i32 = 23;
}

pub(super) fn grammar() -> Result<Grammar, GrammarError> {
    Grammar::builder("bluespec")
        .word("identifier")
        .extras(["_whitespace", "comment"])
        // Packages
        .rule(
            "source_file",
            choice([sym("package"), repeat(sym("_package_item"))]),
        )
        .rule(
            "package",
            seq([
                string("package"),
                sym("Identifier"),
                string(";"),
                repeat(sym("_package_item")),
                string("endpackage"),
                end_label("Identifier"),
            ]),
        )
        .rule(
            "_package_item",
            choice([sym("export_decl"), sym("import_decl"), sym("_package_stmt")]),
        )
        .rule(
            "export_decl",
            seq([string("export"), comma_sep1(sym("export_item")), string(";")]),
        )
        .rule(
            "export_item",
            choice([
                seq([sym("identifier"), optional(export_all())]),
                seq([sym("Identifier"), optional(export_all())]),
                seq([sym("Identifier"), string("::"), string("*")]),
            ]),
        )
        .rule(
            "import_decl",
            seq([string("import"), comma_sep1(sym("import_item")), string(";")]),
        )
        .rule(
            "import_item",
            seq([sym("Identifier"), string("::"), string("*")]),
        )
        .rule(
            "_package_stmt",
            choice([
                sym("typedef_synonym"),
                sym("typedef_enum"),
                sym("typedef_struct"),
                sym("interface_decl"),
                sym("module_def"),
                sym("function_def"),
                sym("var_decl"),
                sym("var_assign"),
            ]),
        )
        // Type definitions
        .rule(
            "typedef_synonym",
            seq([string("typedef"), sym("type"), sym("Identifier"), string(";")]),
        )
        .rule(
            "typedef_enum",
            seq([
                string("typedef"),
                string("enum"),
                string("{"),
                comma_sep1(sym("Identifier")),
                string("}"),
                sym("Identifier"),
                optional(sym("deriving")),
                string(";"),
            ]),
        )
        .rule(
            "typedef_struct",
            seq([
                string("typedef"),
                string("struct"),
                string("{"),
                repeat(sym("struct_member")),
                string("}"),
                sym("Identifier"),
                optional(sym("deriving")),
                string(";"),
            ]),
        )
        .rule(
            "struct_member",
            seq([sym("type"), sym("identifier"), string(";")]),
        )
        .rule(
            "deriving",
            seq([
                string("deriving"),
                string("("),
                comma_sep1(sym("Identifier")),
                string(")"),
            ]),
        )
        // Interfaces
        .rule(
            "interface_decl",
            seq([
                optional(sym("attribute_instance")),
                string("interface"),
                sym("Identifier"),
                optional(sym("formals")),
                string(";"),
                repeat(sym("_interface_member")),
                string("endinterface"),
                end_label("Identifier"),
            ]),
        )
        .rule(
            "_interface_member",
            choice([sym("method_proto"), sym("subinterface_decl")]),
        )
        .rule(
            "method_proto",
            seq([
                string("method"),
                sym("type"),
                sym("identifier"),
                optional(parameter_list()),
                string(";"),
            ]),
        )
        .rule(
            "subinterface_decl",
            seq([
                string("interface"),
                sym("type"),
                sym("identifier"),
                string(";"),
            ]),
        )
        .rule(
            "formals",
            seq([
                string("#"),
                string("("),
                comma_sep1(sym("formal")),
                string(")"),
            ]),
        )
        .rule(
            "formal",
            seq([optional(string("numeric")), string("type"), sym("identifier")]),
        )
        .rule(
            "parameter",
            seq([optional(sym("type")), sym("identifier")]),
        )
        // Modules
        .rule(
            "module_def",
            seq([
                optional(sym("attribute_instance")),
                sym("module_proto"),
                repeat(sym("_module_stmt")),
                string("endmodule"),
                end_label("identifier"),
            ]),
        )
        .rule(
            "attribute_instance",
            seq([string("(*"), comma_sep1(sym("attr_spec")), string("*)")]),
        )
        .rule(
            "attr_spec",
            seq([
                sym("identifier"),
                optional(seq([string("="), sym("_expression")])),
            ]),
        )
        .rule(
            "module_proto",
            seq([
                string("module"),
                optional(seq([string("["), sym("type"), string("]")])),
                sym("identifier"),
                optional(sym("module_formal_params")),
                string("("),
                optional(sym("type")),
                string(")"),
                optional(sym("provisos")),
                string(";"),
            ]),
        )
        .rule(
            "module_formal_params",
            seq([
                string("#"),
                string("("),
                comma_sep1(sym("module_formal_param")),
                string(")"),
            ]),
        )
        .rule(
            "module_formal_param",
            seq([
                optional(sym("attribute_instance")),
                optional(string("parameter")),
                sym("type"),
                sym("identifier"),
            ]),
        )
        .rule(
            "provisos",
            seq([
                string("provisos"),
                string("("),
                comma_sep1(sym("type")),
                string(")"),
            ]),
        )
        .rule(
            "_module_stmt",
            choice([
                sym("module_inst"),
                sym("rule"),
                sym("method_def"),
                sym("subinterface_def"),
                sym("function_def"),
                sym("_action_stmt"),
            ]),
        )
        .rule(
            "module_inst",
            seq([
                sym("type"),
                sym("identifier"),
                string("<-"),
                sym("_expression"),
                string(";"),
            ]),
        )
        .rule(
            "rule",
            seq([
                optional(sym("attribute_instance")),
                string("rule"),
                sym("identifier"),
                optional(sym("rule_condition")),
                string(";"),
                repeat(sym("_action_stmt")),
                string("endrule"),
                end_label("identifier"),
            ]),
        )
        .rule(
            "rule_condition",
            seq([string("("), sym("_expression"), string(")")]),
        )
        .rule("method_def", method_def())
        .rule(
            "subinterface_def",
            seq([
                string("interface"),
                sym("type"),
                sym("identifier"),
                string(";"),
                repeat(sym("_interface_stmt")),
                string("endinterface"),
                end_label("identifier"),
            ]),
        )
        .rule(
            "_interface_stmt",
            choice([
                sym("method_def"),
                sym("subinterface_def"),
                sym("var_decl"),
                sym("let_binding"),
                sym("var_assign"),
            ]),
        )
        .rule(
            "implicit_condition",
            seq([string("if"), string("("), sym("_expression"), string(")")]),
        )
        .rule(
            "function_def",
            seq([
                string("function"),
                sym("type"),
                sym("identifier"),
                parameter_list(),
                optional(sym("provisos")),
                string(";"),
                repeat(sym("_action_stmt")),
                string("endfunction"),
                end_label("identifier"),
            ]),
        )
        // Statements
        .rule(
            "_action_stmt",
            choice([
                sym("var_decl"),
                sym("let_binding"),
                sym("var_assign"),
                sym("var_do"),
                sym("reg_write"),
                sym("call_statement"),
                sym("system_task_call"),
                sym("if_statement"),
                sym("begin_end_block"),
                sym("action_block"),
                sym("actionvalue_block"),
                sym("return_statement"),
            ]),
        )
        .rule(
            "var_decl",
            seq([sym("type"), comma_sep1(sym("var_init")), string(";")]),
        )
        .rule(
            "var_init",
            seq([
                sym("identifier"),
                optional(seq([string("="), sym("_expression")])),
            ]),
        )
        .rule(
            "let_binding",
            seq([
                string("let"),
                sym("identifier"),
                choice([string("="), string("<-")]),
                sym("_expression"),
                string(";"),
            ]),
        )
        .rule(
            "var_assign",
            seq([sym("lvalue"), string("="), sym("_expression"), string(";")]),
        )
        .rule(
            "var_do",
            seq([sym("identifier"), string("<-"), sym("_expression"), string(";")]),
        )
        .rule(
            "reg_write",
            seq([sym("lvalue"), string("<="), sym("_expression"), string(";")]),
        )
        .rule(
            "call_statement",
            seq([sym("lvalue"), optional(sym("arguments")), string(";")]),
        )
        .rule(
            "lvalue",
            choice([
                sym("identifier"),
                seq([sym("lvalue"), string("."), sym("identifier")]),
                seq([
                    sym("lvalue"),
                    string("["),
                    sym("_expression"),
                    optional(seq([string(":"), sym("_expression")])),
                    string("]"),
                ]),
            ]),
        )
        .rule(
            "system_task_call",
            seq([
                sym("system_identifier"),
                optional(sym("arguments")),
                string(";"),
            ]),
        )
        .rule(
            "if_statement",
            // Right associative so a dangling `else` binds to the nearest `if`.
            prec_right(
                0,
                seq([
                    string("if"),
                    string("("),
                    sym("_expression"),
                    string(")"),
                    sym("_action_stmt"),
                    optional(seq([string("else"), sym("_action_stmt")])),
                ]),
            ),
        )
        .rule(
            "begin_end_block",
            seq([
                string("begin"),
                end_label("identifier"),
                repeat(sym("_action_stmt")),
                string("end"),
                end_label("identifier"),
            ]),
        )
        .rule(
            "action_block",
            // `: label` after `endaction` is taken even inside a conditional.
            prec_right(
                0,
                seq([
                    string("action"),
                    end_label("identifier"),
                    repeat(sym("_action_stmt")),
                    string("endaction"),
                    end_label("identifier"),
                ]),
            ),
        )
        .rule(
            "actionvalue_block",
            prec_right(
                0,
                seq([
                    string("actionvalue"),
                    end_label("identifier"),
                    repeat(sym("_action_stmt")),
                    string("endactionvalue"),
                    end_label("identifier"),
                ]),
            ),
        )
        .rule(
            "return_statement",
            seq([string("return"), sym("_expression"), string(";")]),
        )
        // Types
        .rule(
            "type",
            choice([
                sym("Identifier"),
                seq([
                    sym("Identifier"),
                    string("#"),
                    string("("),
                    comma_sep1(sym("_type_argument")),
                    string(")"),
                ]),
                seq([
                    string("bit"),
                    string("["),
                    sym("int_literal"),
                    string(":"),
                    sym("int_literal"),
                    string("]"),
                ]),
            ]),
        )
        .rule(
            "_type_argument",
            choice([sym("type"), sym("identifier"), sym("int_literal")]),
        )
        // Expressions
        .rule(
            "_expression",
            choice([
                sym("binary_expression"),
                sym("unary_expression"),
                sym("conditional_expression"),
                sym("_primary"),
            ]),
        )
        .rule("binary_expression", binary_expression())
        .rule(
            "unary_expression",
            prec(
                precedence::UNARY,
                seq([
                    choice(
                        ["!", "~", "-", "+", "&", "~&", "|", "~|", "^"]
                            .into_iter()
                            .map(string),
                    ),
                    sym("_expression"),
                ]),
            ),
        )
        .rule(
            "conditional_expression",
            prec_right(
                precedence::CONDITIONAL,
                seq([
                    sym("_expression"),
                    string("?"),
                    sym("_expression"),
                    string(":"),
                    sym("_expression"),
                ]),
            ),
        )
        .rule(
            "_primary",
            choice([
                sym("identifier"),
                sym("Identifier"),
                sym("int_literal"),
                sym("real_literal"),
                sym("string_literal"),
                sym("parenthesized_expression"),
                sym("call_expression"),
                sym("member_expression"),
                sym("bit_select"),
                sym("bit_concat"),
                sym("system_call"),
                sym("begin_end_expr"),
                sym("action_block"),
                sym("actionvalue_block"),
                sym("struct_expr"),
                sym("tagged_union_expr"),
                sym("interface_expr"),
            ]),
        )
        .rule(
            "parenthesized_expression",
            seq([string("("), sym("_expression"), string(")")]),
        )
        .rule(
            "call_expression",
            prec(precedence::PARENT, seq([sym("_primary"), sym("arguments")])),
        )
        .rule(
            "member_expression",
            prec(
                precedence::PARENT,
                seq([sym("_primary"), string("."), sym("identifier")]),
            ),
        )
        .rule(
            "bit_select",
            prec(
                precedence::PARENT,
                seq([
                    sym("_primary"),
                    string("["),
                    sym("_expression"),
                    optional(seq([string(":"), sym("_expression")])),
                    string("]"),
                ]),
            ),
        )
        .rule(
            "bit_concat",
            seq([string("{"), comma_sep1(sym("_expression")), string("}")]),
        )
        .rule(
            "system_call",
            // `$time(..)` takes the arguments rather than ending at `$time`.
            prec_right(
                precedence::PARENT,
                seq([sym("system_identifier"), optional(sym("arguments"))]),
            ),
        )
        .rule(
            "begin_end_expr",
            // Statements come before the value; only declarations fit, so
            // the value's leading identifier is never an lvalue.
            prec_right(
                0,
                seq([
                    string("begin"),
                    end_label("identifier"),
                    repeat(choice([sym("var_decl"), sym("let_binding")])),
                    sym("_expression"),
                    string("end"),
                    end_label("identifier"),
                ]),
            ),
        )
        .rule(
            "struct_expr",
            seq([
                sym("Identifier"),
                string("{"),
                comma_sep1(sym("member_bind")),
                string("}"),
            ]),
        )
        .rule(
            "member_bind",
            seq([sym("identifier"), string(":"), sym("_expression")]),
        )
        .rule(
            "tagged_union_expr",
            choice([
                prec(
                    precedence::TAGGED,
                    seq([
                        string("tagged"),
                        sym("Identifier"),
                        string("{"),
                        comma_sep1(sym("member_bind")),
                        string("}"),
                    ]),
                ),
                prec(
                    precedence::TAGGED,
                    seq([string("tagged"), sym("Identifier"), sym("_primary")]),
                ),
                // Below any shift, so `tagged Valid (x)` takes `(x)`.
                prec(-1, seq([string("tagged"), sym("Identifier")])),
            ]),
        )
        .rule(
            "interface_expr",
            prec_right(
                0,
                seq([
                    string("interface"),
                    sym("Identifier"),
                    string(";"),
                    repeat(sym("_interface_stmt")),
                    string("endinterface"),
                    end_label("Identifier"),
                ]),
            ),
        )
        .rule(
            "arguments",
            seq([
                string("("),
                optional(comma_sep1(sym("_expression"))),
                string(")"),
            ]),
        )
        .build()
}

/// `: name` after a closing keyword
fn end_label(name: &str) -> Rule {
    optional(seq([string(":"), sym(name)]))
}

/// `(..)` after an exported type
fn export_all() -> Rule {
    seq([string("("), string(".."), string(")")])
}

fn parameter_list() -> Rule {
    seq([
        string("("),
        optional(comma_sep1(sym("parameter"))),
        string(")"),
    ])
}

fn method_def() -> Rule {
    let head = || {
        seq([
            string("method"),
            optional(sym("type")),
            sym("identifier"),
            optional(parameter_list()),
            optional(sym("implicit_condition")),
        ])
    };
    choice([
        seq([
            head(),
            string(";"),
            repeat(sym("_action_stmt")),
            string("endmethod"),
            end_label("identifier"),
        ]),
        seq([head(), string("="), sym("_expression"), string(";")]),
    ])
}

fn binary_expression() -> Rule {
    let table: [(i32, &[&str]); 11] = [
        (precedence::MUL, &["*", "/", "%"]),
        (precedence::ADD, &["+", "-"]),
        (precedence::SHIFT, &["<<", ">>"]),
        (precedence::RELATIONAL, &["<", "<=", ">", ">="]),
        (precedence::EQUAL, &["==", "!="]),
        (precedence::AND, &["&"]),
        (precedence::XOR, &["^"]),
        (precedence::XNOR, &["~^", "^~"]),
        (precedence::OR, &["|"]),
        (precedence::LOGICAL_AND, &["&&"]),
        (precedence::LOGICAL_OR, &["||"]),
    ];
    choice(table.into_iter().map(|(value, operators)| {
        prec_left(
            value,
            seq([
                sym("_expression"),
                choice(operators.iter().copied().map(string)),
                sym("_expression"),
            ]),
        )
    }))
}
