//! Generalization, levels, and the value restriction.

mod common;

use common::*;
use drift_core::BinaryOp;
use drift_typeck::error::TypeError;

// ── Let-Polymorphism ───────────────────────────────────────────────────

#[test]
fn expression_level_let_generalizes() {
    // let id = λx. x in (let _ = id(1) in id(true))  :  Bool
    let body = let_pat_in(
        pwild(),
        call("id", vec![int(1)]),
        call("id", vec![boolean(true)]),
    );
    let result = check(vec![let_decl(
        "r",
        let_in("id", lam("x", var("x")), body),
    )]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "r"), "Bool");
}

#[test]
fn lambda_parameters_stay_monomorphic() {
    // λf. let _ = f(1) in f(true) -- f is a lambda parameter, not a let
    // binding, so its two uses must agree.
    let result = check(vec![let_decl(
        "g",
        lam(
            "f",
            let_pat_in(
                pwild(),
                app(var("f"), vec![int(1)]),
                app(var("f"), vec![boolean(true)]),
            ),
        ),
    )]);
    assert!(matches!(result.errors[..], [TypeError::Mismatch { .. }]));
}

#[test]
fn inner_binding_of_outer_param_does_not_generalize_it() {
    // λx. let y = x in y  still has one fully connected type: using the
    // outer function at two types is fine (it is polymorphic), but within
    // one application x and the result are the same type.
    let result = check(vec![
        let_decl("f", lam("x", let_in("y", var("x"), var("y")))),
        let_decl("a", call("f", vec![int(1)])),
        let_decl("b", call("f", vec![string("s")])),
    ]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "a"), "Int");
    assert_eq!(decl_ty(&result, "b"), "String");
}

#[test]
fn partial_application_chain_keeps_levels_straight() {
    // f = λx. λy. x; f(1) : (a) -> Int; f(1)(true) : Int.
    let result = check(vec![
        let_decl("f", lam("x", lam("y", var("x")))),
        let_decl("g", call("f", vec![int(1)])),
        let_decl("h", app(call("f", vec![int(1)]), vec![boolean(true)])),
    ]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "h"), "Int");
}

// ── Value Restriction ──────────────────────────────────────────────────

#[test]
fn ref_creation_does_not_generalize() {
    // let r = ref(None): the element type must stay shared. Writing an
    // Int option pins it; a later String write must fail.
    let result = check(vec![
        let_decl("r", call("ref", vec![variant("None", vec![])])),
        let_decl(
            "u1",
            binop(BinaryOp::RefAssign, var("r"), variant("Some", vec![int(1)])),
        ),
        let_decl(
            "u2",
            binop(
                BinaryOp::RefAssign,
                var("r"),
                variant("Some", vec![string("s")]),
            ),
        ),
    ]);
    assert!(
        matches!(result.errors[..], [TypeError::Mismatch { .. }]),
        "the second write must conflict with the first, got: {:?}",
        result.errors
    );

    let scheme = result
        .env
        .lookup_value("r")
        .and_then(|b| b.scheme())
        .expect("r is a plain binding");
    assert!(
        scheme.vars.is_empty(),
        "ref cell must be monomorphic, got {scheme}"
    );
}

#[test]
fn mutable_bindings_do_not_generalize() {
    // let mut m = λx. x -- usable at one type only.
    let result = check(vec![
        let_mut_decl("m", lam("x", var("x"))),
        let_decl("a", call("m", vec![int(1)])),
        let_decl("b", call("m", vec![boolean(true)])),
    ]);
    assert!(matches!(result.errors[..], [TypeError::Mismatch { .. }]));
}

#[test]
fn constructor_of_values_generalizes() {
    // let s = Some(Nil) is a syntactic value: forall quantified.
    let result = check(vec![let_decl("s", variant("Some", vec![variant("Nil", vec![])]))]);
    assert_ok(&result);
    let scheme = result
        .env
        .lookup_value("s")
        .and_then(|b| b.scheme())
        .expect("s is a plain binding");
    assert!(
        !scheme.vars.is_empty(),
        "Some(Nil) should stay polymorphic, got {scheme}"
    );
}

#[test]
fn application_results_stay_monomorphic() {
    // let l = List.reverse(Nil) is an application: not generalized, so
    // pushing an Int fixes the element type and a Bool use fails.
    let result = check(vec![
        let_decl("l", call("List.reverse", vec![variant("Nil", vec![])])),
        let_decl("a", call("Cons", vec![int(1), var("l")])),
        let_decl("b", call("Cons", vec![boolean(true), var("l")])),
    ]);
    assert!(matches!(result.errors[..], [TypeError::Mismatch { .. }]));
}

// ── Recursive Groups ───────────────────────────────────────────────────

#[test]
fn mutual_recursion_in_a_group() {
    // isEven / isOdd call each other; both come out (Int) -> Bool.
    let is_even = lam(
        "n",
        match_(
            var("n"),
            vec![
                case(plit_int(0), boolean(true)),
                case(
                    pwild(),
                    call("isOdd", vec![binop(BinaryOp::Subtract, var("n"), int(1))]),
                ),
            ],
        ),
    );
    let is_odd = lam(
        "n",
        match_(
            var("n"),
            vec![
                case(plit_int(0), boolean(false)),
                case(
                    pwild(),
                    call("isEven", vec![binop(BinaryOp::Subtract, var("n"), int(1))]),
                ),
            ],
        ),
    );
    let result = check(vec![
        let_rec_group(vec![("isEven", is_even), ("isOdd", is_odd)]),
        let_decl("t", call("isEven", vec![int(10)])),
    ]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "isEven"), "(Int) -> Bool");
    assert_eq!(decl_ty(&result, "isOdd"), "(Int) -> Bool");
    assert_eq!(decl_ty(&result, "t"), "Bool");
}

#[test]
fn rec_group_members_generalize_independently() {
    // A polymorphic map alongside a monomorphic user of it.
    let my_map = lam(
        "f",
        lam(
            "xs",
            match_(
                var("xs"),
                vec![
                    case(pvariant("Nil", vec![]), variant("Nil", vec![])),
                    case(
                        pvariant("Cons", vec![pvar("h"), pvar("t")]),
                        variant(
                            "Cons",
                            vec![
                                app(var("f"), vec![var("h")]),
                                app(app(var("myMap"), vec![var("f")]), vec![var("t")]),
                            ],
                        ),
                    ),
                ],
            ),
        ),
    );
    let result = check(vec![
        let_rec_group(vec![("myMap", my_map)]),
        let_decl(
            "ints",
            app(
                app(var("myMap"), vec![lam("x", binop(BinaryOp::Add, var("x"), int(1)))]),
                vec![variant("Cons", vec![int(1), variant("Nil", vec![])])],
            ),
        ),
        let_decl(
            "flags",
            app(
                app(var("myMap"), vec![lam("x", unop_not(var("x")))]),
                vec![variant("Cons", vec![boolean(true), variant("Nil", vec![])])],
            ),
        ),
    ]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "ints"), "List<Int>");
    assert_eq!(decl_ty(&result, "flags"), "List<Bool>");
}

fn unop_not(e: drift_core::CoreExpr) -> drift_core::CoreExpr {
    unop(drift_core::UnaryOp::LogicalNot, e)
}

#[test]
fn expression_level_letrec() {
    // let rec loop = λn. match n { 0 -> 0, _ -> loop(n - 1) } in loop(3)
    let body = letrec_in(
        "loop",
        lam(
            "n",
            match_(
                var("n"),
                vec![
                    case(plit_int(0), int(0)),
                    case(
                        pwild(),
                        call("loop", vec![binop(BinaryOp::Subtract, var("n"), int(1))]),
                    ),
                ],
            ),
        ),
        call("loop", vec![int(3)]),
    );
    let result = check(vec![let_decl("r", body)]);
    assert_ok(&result);
    assert_eq!(decl_ty(&result, "r"), "Int");
}

// ── Escape Analysis ────────────────────────────────────────────────────

#[test]
fn variables_shared_with_a_ref_cell_do_not_generalize_later() {
    // r holds Option<?a>; f = λ_. !r must NOT generalize ?a, or two uses
    // of f could disagree with r's contents.
    let result = check(vec![
        let_decl("r", call("ref", vec![variant("None", vec![])])),
        let_decl("f", lam("u", unop(drift_core::UnaryOp::Deref, var("r")))),
        // First use pins the element type through f...
        let_decl(
            "a",
            call("Option.withDefault", vec![call("f", vec![unit()]), int(0)]),
        ),
        // ...so writing a String into r must now fail.
        let_decl(
            "bad",
            binop(
                BinaryOp::RefAssign,
                var("r"),
                variant("Some", vec![string("s")]),
            ),
        ),
    ]);
    assert!(
        matches!(result.errors[..], [TypeError::Mismatch { .. }]),
        "expected exactly the String write to fail, got: {:?}",
        result.errors
    );
}
