//! Signature and attribute-badge formatting.
//!
//! Pure string building over already-parsed type metadata. Signatures are
//! assembled in stages the way pages consume them: the parameter list first,
//! then the return clause wrapped around it.

use inlay_model::{Access, Doclet, Kind, Param, ReturnDoc, Scope, TypeExpr};

use crate::links::{html_safe, LinkRegistry};

/// Whether a doclet gets a rendered signature: callables always do, and so
/// do typedefs whose declared type includes a function.
pub fn needs_signature(doclet: &Doclet) -> bool {
    match doclet.kind {
        Kind::Function | Kind::Class => true,
        Kind::Typedef => doclet
            .type_
            .as_ref()
            .is_some_and(|t| t.names.iter().any(|n| n.eq_ignore_ascii_case("function"))),
        _ => false,
    }
}

fn item_attributes(optional: bool, nullable: Option<bool>) -> Vec<&'static str> {
    let mut attributes = Vec::new();
    if optional {
        attributes.push("opt");
    }
    match nullable {
        Some(true) => attributes.push("nullable"),
        Some(false) => attributes.push("non-null"),
        None => {}
    }
    attributes
}

fn format_param(param: &Param) -> String {
    let mut name = param.name.clone().unwrap_or_default();
    if param.variable {
        name = format!("&hellip;{name}");
    }
    let attributes = item_attributes(param.optional, param.nullable);
    if attributes.is_empty() {
        name
    } else {
        format!(
            "{name}<span class=\"signature-attributes\">{}</span>",
            attributes.join(", ")
        )
    }
}

/// Formatted parameter names, excluding unnamed parameters and dotted
/// sub-property parameters (those describe nested object fields and are
/// rendered in the parameter table instead).
pub fn param_names(params: &[Param]) -> Vec<String> {
    params
        .iter()
        .filter(|p| p.name.as_deref().is_some_and(|n| !n.contains('.')))
        .map(format_param)
        .collect()
}

fn type_strings(type_: Option<&TypeExpr>, links: &LinkRegistry) -> Vec<String> {
    type_
        .map(|t| {
            t.names
                .iter()
                .map(|name| links.linkto(name, &html_safe(name)))
                .collect()
        })
        .unwrap_or_default()
}

fn attribs_string(attribs: &[String]) -> String {
    if attribs.is_empty() {
        String::new()
    } else {
        html_safe(&format!("({}) ", attribs.join(", ")))
    }
}

/// Attribute badges derived from a doclet's tags.
pub fn attribs_list(doclet: &Doclet) -> Vec<String> {
    let mut attribs = Vec::new();

    if let Some(access) = doclet.access {
        if access != Access::Public {
            attribs.push(access.as_str().to_string());
        }
    }
    if doclet.virtual_
        && matches!(doclet.kind, Kind::Function | Kind::Member | Kind::Constant)
    {
        attribs.push("abstract".to_string());
    }
    if doclet.async_ {
        attribs.push("async".to_string());
    }
    if doclet.generator {
        attribs.push("generator".to_string());
    }
    if let Some(scope) = doclet.scope {
        if scope != Scope::Instance
            && scope != Scope::Global
            && matches!(doclet.kind, Kind::Function | Kind::Member | Kind::Constant)
        {
            attribs.push(scope.as_str().to_string());
        }
    }
    if doclet.readonly && doclet.kind == Kind::Member {
        attribs.push("readonly".to_string());
    }
    if doclet.kind == Kind::Constant {
        attribs.push("constant".to_string());
    }
    match doclet.nullable {
        Some(true) => attribs.push("nullable".to_string()),
        Some(false) => attribs.push("non-null".to_string()),
        None => {}
    }

    attribs
}

fn return_attribs(returns: &[ReturnDoc]) -> Vec<String> {
    let mut attribs: Vec<String> = Vec::new();
    for ret in returns {
        for attrib in item_attributes(ret.optional, ret.nullable) {
            if !attribs.iter().any(|a| a == attrib) {
                attribs.push(attrib.to_string());
            }
        }
    }
    attribs
}

/// Append the parameter list to a doclet's signature.
pub fn add_signature_params(doclet: &mut Doclet) {
    let params = param_names(&doclet.params);
    let existing = doclet.signature.take().unwrap_or_default();
    doclet.signature = Some(format!("{existing}({})", params.join(", ")));
}

/// Wrap the signature with its return-type clause.
pub fn add_signature_returns(doclet: &mut Doclet, links: &LinkRegistry) {
    let attribs = attribs_string(&return_attribs(&doclet.returns));

    let return_types: Vec<String> = doclet
        .returns
        .iter()
        .flat_map(|r| type_strings(r.type_.as_ref(), links))
        .collect();
    let clause = if return_types.is_empty() {
        String::new()
    } else {
        format!("{attribs}{{{}}}", return_types.join("|"))
    };

    let existing = doclet.signature.take().unwrap_or_default();
    doclet.signature = Some(format!(
        "<span class=\"signature\">{existing}</span><span class=\"return-type\">{clause}</span>"
    ));
}

/// Append the declared type of a non-callable member.
pub fn add_signature_types(doclet: &mut Doclet, links: &LinkRegistry) {
    let types = type_strings(doclet.type_.as_ref(), links);
    let clause = if types.is_empty() {
        String::new()
    } else {
        format!(" :{}", types.join("|"))
    };

    let existing = doclet.signature.take().unwrap_or_default();
    doclet.signature = Some(format!(
        "{existing}<span class=\"return-type\">{clause}</span>"
    ));
}

/// Fill in the attribute badge span.
pub fn add_attribs(doclet: &mut Doclet) {
    let badge = attribs_string(&attribs_list(doclet));
    doclet.attribs = format!("<span class=\"type-signature\">{badge}</span>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn param(name: &str) -> Param {
        Param {
            name: Some(name.into()),
            ..Param::default()
        }
    }

    fn typed(names: &[&str]) -> TypeExpr {
        TypeExpr {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn callables_need_signatures() {
        let func = Doclet {
            kind: Kind::Function,
            ..Doclet::default()
        };
        assert!(needs_signature(&func));

        let typedef = Doclet {
            kind: Kind::Typedef,
            type_: Some(typed(&["Function"])),
            ..Doclet::default()
        };
        assert!(needs_signature(&typedef));

        let plain_typedef = Doclet {
            kind: Kind::Typedef,
            type_: Some(typed(&["object"])),
            ..Doclet::default()
        };
        assert!(!needs_signature(&plain_typedef));

        let member = Doclet {
            kind: Kind::Member,
            ..Doclet::default()
        };
        assert!(!needs_signature(&member));
    }

    #[test]
    fn dotted_subproperties_are_excluded() {
        let params = vec![param("a"), param("a.b"), param("c")];
        assert_eq!(param_names(&params), vec!["a", "c"]);
    }

    #[test]
    fn unnamed_params_are_excluded() {
        let params = vec![Param::default(), param("x")];
        assert_eq!(param_names(&params), vec!["x"]);
    }

    #[test]
    fn variadic_and_attribute_markup() {
        let mut rest = param("args");
        rest.variable = true;
        assert_eq!(param_names(&[rest]), vec!["&hellip;args"]);

        let mut opt = param("base");
        opt.optional = true;
        opt.nullable = Some(true);
        assert_eq!(
            param_names(&[opt]),
            vec!["base<span class=\"signature-attributes\">opt, nullable</span>"]
        );

        let mut non_null = param("ratio");
        non_null.nullable = Some(false);
        assert_eq!(
            param_names(&[non_null]),
            vec!["ratio<span class=\"signature-attributes\">non-null</span>"]
        );
    }

    #[test]
    fn params_then_returns_compose_the_signature() {
        let links = LinkRegistry::new();
        let mut doclet = Doclet {
            longname: "foo".into(),
            name: "foo".into(),
            kind: Kind::Function,
            returns: vec![ReturnDoc {
                type_: Some(typed(&["string"])),
                ..ReturnDoc::default()
            }],
            ..Doclet::default()
        };

        add_signature_params(&mut doclet);
        assert_eq!(doclet.signature.as_deref(), Some("()"));

        add_signature_returns(&mut doclet, &links);
        assert_eq!(
            doclet.signature.as_deref(),
            Some("<span class=\"signature\">()</span><span class=\"return-type\">{string}</span>")
        );
    }

    #[test]
    fn return_types_link_when_registered() {
        let mut links = LinkRegistry::new();
        links.register("Color", "Color.html");

        let mut doclet = Doclet {
            kind: Kind::Function,
            returns: vec![
                ReturnDoc {
                    type_: Some(typed(&["Color"])),
                    nullable: Some(true),
                    ..ReturnDoc::default()
                },
                ReturnDoc {
                    type_: Some(typed(&["undefined"])),
                    nullable: Some(true),
                    ..ReturnDoc::default()
                },
            ],
            ..Doclet::default()
        };

        add_signature_returns(&mut doclet, &links);
        let signature = doclet.signature.unwrap();

        // the nullable attribute appears once even though both entries
        // carry it
        assert_eq!(signature.matches("nullable").count(), 1);
        assert!(signature.contains("(nullable) "));
        assert!(signature.contains("<a href=\"Color.html\">Color</a>|undefined"));
    }

    #[test]
    fn no_return_types_means_no_clause() {
        let links = LinkRegistry::new();
        let mut doclet = Doclet {
            kind: Kind::Function,
            ..Doclet::default()
        };

        add_signature_params(&mut doclet);
        add_signature_returns(&mut doclet, &links);

        assert_eq!(
            doclet.signature.as_deref(),
            Some("<span class=\"signature\">()</span><span class=\"return-type\"></span>")
        );
    }

    #[test]
    fn member_type_clause() {
        let links = LinkRegistry::new();
        let mut doclet = Doclet {
            kind: Kind::Member,
            type_: Some(typed(&["number", "string"])),
            ..Doclet::default()
        };

        add_signature_types(&mut doclet, &links);
        assert_eq!(
            doclet.signature.as_deref(),
            Some("<span class=\"return-type\"> :number|string</span>")
        );
    }

    #[test]
    fn attribute_badges() {
        let mut doclet = Doclet {
            kind: Kind::Member,
            access: Some(Access::Private),
            scope: Some(Scope::Static),
            readonly: true,
            ..Doclet::default()
        };

        assert_eq!(attribs_list(&doclet), vec!["private", "static", "readonly"]);

        add_attribs(&mut doclet);
        assert_eq!(
            doclet.attribs,
            "<span class=\"type-signature\">(private, static, readonly) </span>"
        );

        let async_fn = Doclet {
            kind: Kind::Function,
            async_: true,
            ..Doclet::default()
        };
        assert_eq!(attribs_list(&async_fn), vec!["async"]);

        let constant = Doclet {
            kind: Kind::Constant,
            ..Doclet::default()
        };
        assert_eq!(attribs_list(&constant), vec!["constant"]);
    }
}
