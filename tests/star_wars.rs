//! Integration tests over a hand-written Star Wars schema.
//!
//! The `schema` module shows how generated bindings sit on top of kayu: one
//! marker type per GraphQL object and an extension trait on `Fields` for each
//! marker.

use kayu::prelude::*;
use kayu::{GraphQLResponseError, Result, hash};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schema::*;

mod schema {
    use kayu::Result;
    use kayu::prelude::*;

    pub struct Query;
    pub struct Character;
    pub struct Human;
    pub struct Droid;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Episode {
        NewHope,
        Empire,
        Jedi,
    }

    enum_codec!(Episode {
        NewHope => "NEWHOPE",
        Empire => "EMPIRE",
        Jedi => "JEDI",
    });

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum LengthUnit {
        Meter,
        Foot,
    }

    enum_codec!(LengthUnit {
        Meter => "METER",
        Foot => "FOOT",
    });

    pub trait QueryFields {
        fn hero<T>(&mut self, episode: Option<Episode>, selection: &SelectionSet<Character, T>) -> Result<T>
        where
            T: Clone + 'static;

        fn human<T>(&mut self, id: Id, selection: &SelectionSet<Human, T>) -> Result<Option<T>>
        where
            T: Clone + Send + Sync + 'static;

        fn humans<T>(&mut self, selection: &SelectionSet<Human, T>) -> Result<Vec<T>>
        where
            T: Clone + Send + Sync + 'static;
    }

    impl QueryFields for Fields<'_, Query> {
        fn hero<T>(&mut self, episode: Option<Episode>, selection: &SelectionSet<Character, T>) -> Result<T>
        where
            T: Clone + 'static,
        {
            self.composite("hero", vec![arg_opt("episode", "Episode", episode)], selection)
        }

        fn human<T>(&mut self, id: Id, selection: &SelectionSet<Human, T>) -> Result<Option<T>>
        where
            T: Clone + Send + Sync + 'static,
        {
            self.composite("human", vec![arg("id", "ID!", id)], &selection.nullable())
        }

        fn humans<T>(&mut self, selection: &SelectionSet<Human, T>) -> Result<Vec<T>>
        where
            T: Clone + Send + Sync + 'static,
        {
            self.composite("humans", Vec::new(), &selection.list())
        }
    }

    pub trait CharacterFields {
        fn id(&mut self) -> Result<Id>;
        fn name(&mut self) -> Result<String>;
    }

    impl CharacterFields for Fields<'_, Character> {
        fn id(&mut self) -> Result<Id> {
            self.leaf("id", Vec::new())
        }

        fn name(&mut self) -> Result<String> {
            self.leaf("name", Vec::new())
        }
    }

    pub trait HumanFields {
        fn id(&mut self) -> Result<Id>;
        fn name(&mut self) -> Result<String>;
        fn home_planet(&mut self) -> Result<Option<String>>;
        fn height(&mut self, unit: Option<LengthUnit>) -> Result<Option<f64>>;
        fn appears_in(&mut self) -> Result<Vec<Option<Episode>>>;
    }

    impl HumanFields for Fields<'_, Human> {
        fn id(&mut self) -> Result<Id> {
            self.leaf("id", Vec::new())
        }

        fn name(&mut self) -> Result<String> {
            self.leaf("name", Vec::new())
        }

        fn home_planet(&mut self) -> Result<Option<String>> {
            self.leaf("homePlanet", Vec::new())
        }

        fn height(&mut self, unit: Option<LengthUnit>) -> Result<Option<f64>> {
            self.leaf("height", vec![arg_opt("unit", "LengthUnit", unit)])
        }

        fn appears_in(&mut self) -> Result<Vec<Option<Episode>>> {
            self.leaf("appearsIn", Vec::new())
        }
    }

    pub trait DroidFields {
        fn name(&mut self) -> Result<String>;
        fn primary_function(&mut self) -> Result<Option<String>>;
    }

    impl DroidFields for Fields<'_, Droid> {
        fn name(&mut self) -> Result<String> {
            self.leaf("name", Vec::new())
        }

        fn primary_function(&mut self) -> Result<Option<String>> {
            self.leaf("primaryFunction", Vec::new())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Hero {
    Human {
        name: String,
        home_planet: Option<String>,
    },
    Droid {
        name: String,
        primary_function: Option<String>,
    },
}

fn key(name: &str, arguments: &[Argument]) -> String {
    format!("{name}_{}", hash(arguments))
}

fn episode(value: Option<Episode>) -> Argument {
    arg_opt("episode", "Episode", value)
}

fn hero_selection() -> SelectionSet<Character, Hero> {
    let human = selection(|fields: &mut Fields<'_, Human>| {
        Ok(Hero::Human {
            name: fields.name()?,
            home_planet: fields.home_planet()?,
        })
    });
    let droid = selection(|fields: &mut Fields<'_, Droid>| {
        Ok(Hero::Droid {
            name: fields.name()?,
            primary_function: fields.primary_function()?,
        })
    });

    selection(move |fields: &mut Fields<'_, Character>| {
        fields.on(Fragments::new().case("Human", &human).case("Droid", &droid))
    })
}

fn hero_query(value: Option<Episode>) -> SelectionSet<Query, Hero> {
    let hero = hero_selection();
    selection(move |fields: &mut Fields<'_, Query>| fields.hero(value, &hero))
}

fn human_name() -> SelectionSet<Human, String> {
    selection(|fields: &mut Fields<'_, Human>| fields.name())
}

// =============================================================================
// Document Tests
// =============================================================================

#[test]
fn test_hero_document() {
    let query = hero_query(Some(Episode::Empire));
    let variable = episode(Some(Episode::Empire)).variable();
    let empty = hash(&[]);

    let document = query.operation(OperationKind::Query).document();

    assert_eq!(
        document,
        format!(
            "query (${variable}: Episode) {{\n\
             \x20 {hero}: hero(episode: ${variable}) {{\n\
             \x20   __typename\n\
             \x20   ... on Human {{\n\
             \x20     __typename\n\
             \x20     name_{empty}: name\n\
             \x20     homePlanet_{empty}: homePlanet\n\
             \x20   }}\n\
             \x20   ... on Droid {{\n\
             \x20     __typename\n\
             \x20     name_{empty}: name\n\
             \x20     primaryFunction_{empty}: primaryFunction\n\
             \x20   }}\n\
             \x20 }}\n\
             }}",
            hero = key("hero", &[episode(Some(Episode::Empire))]),
        )
    );
}

#[test]
fn test_omitted_argument_is_not_declared() {
    let query = hero_query(None);
    let operation = query.operation(OperationKind::Query);

    let document = operation.document();

    assert!(document.starts_with(&format!(
        "query {{\n  {}: hero {{\n",
        key("hero", &[episode(None)])
    )));
    assert!(operation.variables().is_empty());
}

#[test]
fn test_variables_carry_serialized_arguments() {
    let height = selection(|fields: &mut Fields<'_, Human>| fields.height(Some(LengthUnit::Foot)));
    let query = selection(move |fields: &mut Fields<'_, Query>| {
        fields.human(Id::from("1000"), &height)
    });

    let variables = query.operation(OperationKind::Query).variables();

    assert_eq!(variables.len(), 2);
    assert_eq!(
        variables.get(&arg("id", "ID!", Id::from("1000")).variable()),
        Some(&json!("1000"))
    );
    assert_eq!(
        variables.get(&arg("unit", "LengthUnit", LengthUnit::Foot).variable()),
        Some(&json!("FOOT"))
    );
}

#[test]
fn test_collecting_again_yields_the_same_selection() {
    let query = hero_query(Some(Episode::Jedi));

    let (fields, mock) = query.collect().unwrap();

    assert_eq!(fields, query.fields());
    assert_eq!(&mock, query.mock());
    assert_eq!(
        mock,
        Hero::Human {
            name: "42".to_string(),
            home_planet: None,
        }
    );
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_hero_decodes_each_concrete_type() {
    let query = hero_query(Some(Episode::NewHope));
    let hero = key("hero", &[episode(Some(Episode::NewHope))]);
    let empty = hash(&[]);

    let luke = json!({
        hero.clone(): {
            "__typename": "Human",
            format!("name_{empty}"): "Luke Skywalker",
            format!("homePlanet_{empty}"): "Tatooine",
        }
    });
    let r2 = json!({
        hero: {
            "__typename": "Droid",
            format!("name_{empty}"): "R2-D2",
            format!("primaryFunction_{empty}"): "Astromech",
        }
    });

    assert_eq!(
        query.decode(&luke).unwrap(),
        Hero::Human {
            name: "Luke Skywalker".to_string(),
            home_planet: Some("Tatooine".to_string()),
        }
    );
    assert_eq!(
        query.decode(&r2).unwrap(),
        Hero::Droid {
            name: "R2-D2".to_string(),
            primary_function: Some("Astromech".to_string()),
        }
    );
}

#[test]
fn test_unknown_typename_is_a_variant_error() {
    let query = hero_query(None);
    let data = json!({
        key("hero", &[episode(None)]): { "__typename": "Starship" }
    });

    let error = query.decode(&data).unwrap_err();

    assert!(error.is_variant_error());
    assert!(matches!(
        error,
        DecodeError::UnknownVariant { ref typename, ref expected }
            if typename == "Starship" && expected == &["Human", "Droid"]
    ));
}

#[test]
fn test_same_field_with_different_arguments() {
    let name = human_name();
    let query = selection(move |fields: &mut Fields<'_, Query>| {
        Ok((
            fields.human(Id::from("1000"), &name)?,
            fields.human(Id::from("1003"), &name)?,
        ))
    });
    let empty = hash(&[]);
    let data = json!({
        key("human", &[arg("id", "ID!", Id::from("1000"))]): { format!("name_{empty}"): "Luke Skywalker" },
        key("human", &[arg("id", "ID!", Id::from("1003"))]): { format!("name_{empty}"): "Leia Organa" },
    });

    let (luke, leia) = query.decode(&data).unwrap();

    assert_eq!(query.fields().len(), 2);
    assert_eq!(luke.as_deref(), Some("Luke Skywalker"));
    assert_eq!(leia.as_deref(), Some("Leia Organa"));
}

#[test]
fn test_nullable_object() {
    let name = human_name();
    let query = selection(move |fields: &mut Fields<'_, Query>| fields.human(Id::from("2000"), &name));
    let data = json!({ key("human", &[arg("id", "ID!", Id::from("2000"))]): null });

    assert_eq!(query.decode(&data).unwrap(), None);
    assert_eq!(query.mock(), &None);
}

#[test]
fn test_non_null_or_fail() {
    let name = human_name().non_null_or_fail();
    let query = selection(move |fields: &mut Fields<'_, Query>| {
        fields.composite("human", vec![arg("id", "ID!", Id::from("1000"))], &name)
    });
    let human = key("human", &[arg("id", "ID!", Id::from("1000"))]);
    let empty = hash(&[]);

    let present = json!({ human.clone(): { format!("name_{empty}"): "Luke Skywalker" } });
    let missing = json!({ human: null });

    assert_eq!(query.decode(&present).unwrap(), "Luke Skywalker");
    assert!(matches!(
        query.decode(&missing).unwrap_err(),
        DecodeError::UnexpectedNull
    ));
}

#[test]
fn test_list_of_objects() {
    let details = selection(|fields: &mut Fields<'_, Human>| {
        Ok((fields.id()?, fields.appears_in()?))
    });
    let query = selection(move |fields: &mut Fields<'_, Query>| fields.humans(&details));
    let empty = hash(&[]);
    let data = json!({
        key("humans", &[]): [
            { format!("id_{empty}"): "1000", format!("appearsIn_{empty}"): ["NEWHOPE", "EMPIRE", "JEDI"] },
            { format!("id_{empty}"): 1003, format!("appearsIn_{empty}"): [null] },
        ]
    });

    let humans = query.decode(&data).unwrap();

    assert_eq!(
        humans,
        vec![
            (
                Id::from("1000"),
                vec![
                    Some(Episode::NewHope),
                    Some(Episode::Empire),
                    Some(Episode::Jedi)
                ]
            ),
            (Id::from("1003"), vec![None]),
        ]
    );
    assert!(query.mock().is_empty());
}

#[test]
fn test_missing_alias_is_reported() {
    let query = hero_query(None);
    let data = json!({ "hero": { "__typename": "Human" } });

    let error = query.decode(&data).unwrap_err();

    assert!(error.is_bad_payload());
    assert!(matches!(error, DecodeError::MissingField { .. }));
}

// =============================================================================
// Client Tests
// =============================================================================

#[tokio::test]
async fn test_query_over_http() {
    let server = MockServer::start().await;
    let hero = key("hero", &[episode(Some(Episode::Empire))]);
    let empty = hash(&[]);

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                hero: {
                    "__typename": "Droid",
                    format!("name_{empty}"): "R2-D2",
                    format!("primaryFunction_{empty}"): null,
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GraphQLClientConfig::builder()
        .endpoint(format!("{}/graphql", server.uri()))
        .bearer_auth("secret")
        .build();
    let client = GraphQLClient::with_config(config).unwrap();
    let query = hero_query(Some(Episode::Empire));

    let response = client
        .query(&query)
        .operation_name("Hero")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.into_result().unwrap(),
        Hero::Droid {
            name: "R2-D2".to_string(),
            primary_function: None,
        }
    );

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["operationName"], "Hero");
    assert!(
        body["query"]
            .as_str()
            .unwrap()
            .starts_with("query Hero ($_")
    );
    assert_eq!(
        body["variables"][episode(Some(Episode::Empire)).variable()],
        "EMPIRE"
    );
}

#[tokio::test]
async fn test_partial_success_over_http() {
    let server = MockServer::start().await;
    let name = human_name();
    let query = selection(move |fields: &mut Fields<'_, Query>| fields.human(Id::from("3000"), &name));

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { key("human", &[arg("id", "ID!", Id::from("3000"))]): null },
            "errors": [{ "message": "Human 3000 is classified", "path": ["human"] }]
        })))
        .mount(&server)
        .await;

    let client = GraphQLClient::new(server.uri()).unwrap();

    let response = client.query(&query).send().await.unwrap();

    assert_eq!(response.data, None);
    assert_eq!(
        response.errors,
        vec![GraphQLResponseError {
            message: "Human 3000 is classified".to_string(),
            locations: None,
            path: Some(vec![kayu::kayu_client::PathSegment::Field("human".to_string())]),
            extensions: None,
        }]
    );
}

#[tokio::test]
async fn test_errors_without_data_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Cannot query field \"hero\"" }]
        })))
        .mount(&server)
        .await;

    let client = GraphQLClient::new(server.uri()).unwrap();
    let query = hero_query(None);

    let error = client.query(&query).send().await.unwrap_err();

    assert!(error.is_graphql_error());
    assert_eq!(error.graphql_errors().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_status_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = GraphQLClient::new(server.uri()).unwrap();
    let query = hero_query(None);

    let error: kayu::RequestError = client.query(&query).send().await.unwrap_err();

    assert!(error.is_bad_status());
    assert_eq!(error.status(), Some(502));
}

#[test]
fn test_result_alias_is_the_decode_result() {
    let decoded: Result<String> = human_name().decode(&json!({ key("name", &[]): "Han Solo" }));

    assert_eq!(decoded.unwrap(), "Han Solo");
}
