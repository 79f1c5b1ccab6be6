use bluesitter::bluespec::language;
use bluesitter::parse;
use rstest::rstest;

#[rstest]
#[case::import("import FIFO::*;", "(source_file (import_decl (import_item (Identifier))))")]
#[case::enumeration(
    "typedef enum { Idle, Busy } State deriving (Bits, Eq);",
    "(source_file (typedef_enum (Identifier) (Identifier) (Identifier) (deriving (Identifier) (Identifier))))"
)]
#[case::declaration(
    "Bit#(8) mask = 8'hF0;",
    "(source_file (var_decl (type (Identifier) (int_literal)) (var_init (identifier) (int_literal))))"
)]
#[case::precedence(
    "x = a + b * c;",
    "(source_file (var_assign (lvalue (identifier)) (binary_expression (identifier) (binary_expression (identifier) (identifier)))))"
)]
#[case::unary(
    "x = !a && b;",
    "(source_file (var_assign (lvalue (identifier)) (binary_expression (unary_expression (identifier)) (identifier))))"
)]
#[case::conditional(
    "x = c ? a : b;",
    "(source_file (var_assign (lvalue (identifier)) (conditional_expression (identifier) (identifier) (identifier))))"
)]
#[case::method_call(
    "x = counter.read();",
    "(source_file (var_assign (lvalue (identifier)) (call_expression (member_expression (identifier) (identifier)) (arguments))))"
)]
#[case::system_call(
    "x = $time;",
    "(source_file (var_assign (lvalue (identifier)) (system_call (system_identifier))))"
)]
#[case::struct_expr(
    "x = Pair { a: 1, b: y };",
    "(source_file (var_assign (lvalue (identifier)) (struct_expr (Identifier) (member_bind (identifier) (int_literal)) (member_bind (identifier) (identifier)))))"
)]
#[case::tagged_with_value(
    "x = tagged Valid 5;",
    "(source_file (var_assign (lvalue (identifier)) (tagged_union_expr (Identifier) (int_literal))))"
)]
#[case::tagged_without_value(
    "x = tagged Invalid;",
    "(source_file (var_assign (lvalue (identifier)) (tagged_union_expr (Identifier))))"
)]
#[case::tagged_binds_tighter_than_add(
    "x = tagged Valid y + 1;",
    "(source_file (var_assign (lvalue (identifier)) (binary_expression (tagged_union_expr (Identifier) (identifier)) (int_literal))))"
)]
#[case::begin_end_expr(
    "x = begin let y = 1; y + 1 end;",
    "(source_file (var_assign (lvalue (identifier)) (begin_end_expr (let_binding (identifier) (int_literal)) (binary_expression (identifier) (int_literal)))))"
)]
#[case::actionvalue_expr(
    "x = actionvalue return 1; endactionvalue;",
    "(source_file (var_assign (lvalue (identifier)) (actionvalue_block (return_statement (int_literal)))))"
)]
fn test_snippet_sexp(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(parse(&language(), text).to_sexp(), expected);
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    let text = "module mkTb(); rule r; if (a) if (b) x <= 1; else x <= 2; endrule endmodule";
    assert_eq!(
        parse(&language(), text).to_sexp(),
        "(source_file (module_def (module_proto (identifier)) (rule (identifier) \
         (if_statement (identifier) (if_statement (identifier) \
         (reg_write (lvalue (identifier)) (int_literal)) \
         (reg_write (lvalue (identifier)) (int_literal)))))))"
    );
}

#[test]
fn test_keyword_text_is_an_identifier_where_no_keyword_fits() {
    let tree = parse(&language(), "module mkTb(); rule end; endrule endmodule");
    assert_eq!(
        tree.to_sexp(),
        "(source_file (module_def (module_proto (identifier)) (rule (identifier))))"
    );
    assert!(!tree.has_error());
}

#[rstest]
#[case::action_block_in_rule(
    "module mkA(Ifc); rule r; action x <= 1; endaction endrule endmodule",
    "(source_file (module_def (module_proto (identifier) (type (Identifier))) \
     (rule (identifier) (action_block (reg_write (lvalue (identifier)) (int_literal))))))"
)]
#[case::labelled_action_block(
    "module mkA(Ifc); rule r; action: go x <= 1; endaction: go endrule endmodule",
    "(source_file (module_def (module_proto (identifier) (type (Identifier))) \
     (rule (identifier) (action_block (identifier) (reg_write (lvalue (identifier)) (int_literal)) (identifier)))))"
)]
#[case::subinterface_def(
    "module mkA(Ifc); interface Get get; method Bit#(8) get(); return 0; endmethod endinterface endmodule",
    "(source_file (module_def (module_proto (identifier) (type (Identifier))) \
     (subinterface_def (type (Identifier)) (identifier) \
     (method_def (type (Identifier) (int_literal)) (identifier) (return_statement (int_literal))))))"
)]
#[case::interface_expr(
    "module mkA(Ifc); return interface Ifc; method m = 1; endinterface; endmodule",
    "(source_file (module_def (module_proto (identifier) (type (Identifier))) \
     (return_statement (interface_expr (Identifier) (method_def (identifier) (int_literal))))))"
)]
#[case::module_parameters(
    "module mkA #(parameter Bit#(8) init) (Ifc); endmodule",
    "(source_file (module_def (module_proto (identifier) \
     (module_formal_params (module_formal_param (type (Identifier) (int_literal)) (identifier))) \
     (type (Identifier)))))"
)]
#[case::var_do(
    "module mkA(Ifc); rule r; v <- fifo.first; endrule endmodule",
    "(source_file (module_def (module_proto (identifier) (type (Identifier))) \
     (rule (identifier) (var_do (identifier) (member_expression (identifier) (identifier))))))"
)]
#[case::function_provisos(
    "function Bit#(n) f(Bit#(n) x) provisos (Add#(n, 1, m)); return x; endfunction",
    "(source_file (function_def (type (Identifier) (identifier)) (identifier) \
     (parameter (type (Identifier) (identifier)) (identifier)) \
     (provisos (type (Identifier) (identifier) (int_literal) (identifier))) \
     (return_statement (identifier))))"
)]
fn test_block_constructs(#[case] text: &str, #[case] expected: &str) {
    let tree = parse(&language(), text);
    assert!(!tree.has_error(), "{}", tree.to_sexp());
    assert_eq!(tree.to_sexp(), expected);
}
