//! Person accessors.
//!
//! A [`Person`] wraps one `nm` id and exposes every attribute the service
//! knows about. Each accessor fetches its field on first use, normalizes it,
//! and keeps the result for later calls; a failed fetch is retried on the next
//! call.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use imdb_graphql::{
    Connection, EntityId, EntityKind, FilterClause, GraphEngine, ImageVariant, Memo, Nav,
    RelationshipType, SortOrder, normalize_date,
};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ImdbResult;
use crate::types::{
    AwardFilter, AwardNomination, AwardOutcome, AwardTitle, Awards, Birth, Credit, Credits, Death,
    ExternalSite, ExternalSites, FilmBiography, Height, KnownFor, MiniBio, OtherWork, Portrayal,
    PrintBiography, Rank, Relative, Salary, Spouse,
};

const TITLE_FRAGMENT: &str = "title {
  id
  titleText {
    text
  }
  releaseYear {
    year
  }
}";

const SPOUSES_SELECTION: &str = "spouses {
  spouse {
    name {
      id
    }
    asMarkdown {
      plainText
    }
  }
  timeRange {
    fromDate {
      dateComponents {
        day
        month
        year
      }
    }
    toDate {
      dateComponents {
        day
        month
        year
      }
    }
    displayableProperty {
      value {
        plainText
      }
    }
  }
  attributes {
    text
  }
  current
}";

const FILM_BIOGRAPHY_FRAGMENT: &str = "... on NameFilmBiography {
  title {
    titleText {
      text
    }
    id
    releaseYear {
      year
    }
    series {
      displayableEpisodeNumber {
        displayableSeason {
          text
        }
        episodeNumber {
          text
        }
      }
      series {
        titleText {
          text
        }
      }
    }
  }
}";

const SALARY_FRAGMENT: &str = "title {
  titleText {
    text
  }
  id
  releaseYear {
    year
  }
}
amount {
  amount
  currency
}
attributes {
  text
}";

const RELATION_FRAGMENT: &str = "relationName {
  name {
    id
    nameText {
      text
    }
  }
  nameText
}
relationshipType {
  text
}";

const AWARD_FRAGMENT: &str = "award {
  event {
    text
  }
  text
  category {
    text
  }
  eventEdition {
    year
  }
  notes {
    plainText
  }
}
isWinner
awardedEntities {
  ... on AwardedNames {
    secondaryAwardTitles {
      title {
        id
        titleText {
          text
        }
        primaryImage {
          url
          width
          height
        }
      }
      note {
        plainText
      }
    }
  }
}";

const KNOWN_FOR_FRAGMENT: &str = "credit {
  title {
    id
    titleText {
      text
    }
    releaseYear {
      year
      endYear
    }
    primaryImage {
      url
      width
      height
    }
  }
  ... on Cast {
    characters {
      name
    }
  }
}";

const CREDIT_FRAGMENT: &str = "category {
  id
}
title {
  id
  titleText {
    text
  }
  titleType {
    text
  }
  releaseYear {
    year
    endYear
  }
  primaryImage {
    url
    width
    height
  }
}
... on Cast {
  characters {
    name
  }
}
... on Crew {
  jobs {
    text
  }
}";

/// A person (`nm` id) with lazily fetched attributes.
pub struct Person {
    id: EntityId,
    engine: GraphEngine,
    name: Memo<Option<String>>,
    photo: Memo<ImageVariant>,
    birth_name: Memo<Option<String>>,
    nicknames: Memo<Vec<String>>,
    aka_names: Memo<Vec<String>>,
    birth: Memo<Birth>,
    death: Memo<Death>,
    age: Memo<Option<u64>>,
    professions: Memo<Vec<String>>,
    rank: Memo<Option<Rank>>,
    height: Memo<Option<Height>>,
    spouses: Memo<Vec<Spouse>>,
    children: Memo<Vec<Relative>>,
    parents: Memo<Vec<Relative>>,
    relatives: Memo<Vec<Relative>>,
    bio: Memo<Vec<MiniBio>>,
    trivia: Memo<Vec<String>>,
    quotes: Memo<Vec<String>>,
    trademarks: Memo<Vec<String>>,
    salaries: Memo<Vec<Salary>>,
    print_biographies: Memo<Vec<PrintBiography>>,
    film_biographies: Memo<Vec<FilmBiography>>,
    portrayals: Memo<Vec<Portrayal>>,
    other_works: Memo<Vec<OtherWork>>,
    external_sites: Memo<ExternalSites>,
    awards: Mutex<HashMap<AwardFilter, Arc<Memo<Awards>>>>,
    known_for: Memo<Vec<KnownFor>>,
    credits: Memo<Credits>,
}

impl fmt::Debug for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Person {
    /// A person backed by `engine`. Nothing is fetched yet.
    #[must_use]
    pub fn new(id: EntityId, engine: GraphEngine) -> Self {
        Self {
            id,
            engine,
            name: Memo::new(),
            photo: Memo::new(),
            birth_name: Memo::new(),
            nicknames: Memo::new(),
            aka_names: Memo::new(),
            birth: Memo::new(),
            death: Memo::new(),
            age: Memo::new(),
            professions: Memo::new(),
            rank: Memo::new(),
            height: Memo::new(),
            spouses: Memo::new(),
            children: Memo::new(),
            parents: Memo::new(),
            relatives: Memo::new(),
            bio: Memo::new(),
            trivia: Memo::new(),
            quotes: Memo::new(),
            trademarks: Memo::new(),
            salaries: Memo::new(),
            print_biographies: Memo::new(),
            film_biographies: Memo::new(),
            portrayals: Memo::new(),
            other_works: Memo::new(),
            external_sites: Memo::new(),
            awards: Mutex::new(HashMap::new()),
            known_for: Memo::new(),
            credits: Memo::new(),
        }
    }

    /// Parse `raw` (`"0000123"` or `"nm0000123"`) and wrap it.
    pub fn parse(raw: &str, engine: GraphEngine) -> ImdbResult<Self> {
        Ok(Self::new(EntityId::name(raw)?, engine))
    }

    /// Person id, without prefix.
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    async fn query(&self, operation: &str, selection: &str) -> ImdbResult<Value> {
        Ok(self.engine.query(operation, &self.id, selection).await?)
    }

    async fn nodes(&self, connection: Connection) -> ImdbResult<Vec<Value>> {
        Ok(self.engine.fetch_all(&self.id, &connection).await?)
    }

    fn title_image(&self, image: Nav<'_>) -> ImageVariant {
        self.engine.image(image, self.engine.config().title_thumbnail)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Main page
    // ─────────────────────────────────────────────────────────────────────────

    /// Display name.
    pub async fn name(&self) -> ImdbResult<Option<&str>> {
        let name = cached(&self.name, move || async move {
            let data = self.query("Name", "nameText {\n  text\n}").await?;
            Ok(person(&data).path(&["nameText", "text"]).non_empty_string())
        })
        .await?;
        Ok(name.as_deref())
    }

    /// Primary photo: full size and a thumbnail at the configured photo size.
    pub async fn photo(&self) -> ImdbResult<&ImageVariant> {
        cached(&self.photo, move || async move {
            let data = self
                .query("Poster", "primaryImage {\n  url\n  width\n  height\n}")
                .await?;
            Ok(self.engine.image(
                person(&data).get("primaryImage"),
                self.engine.config().photo_thumbnail,
            ))
        })
        .await
    }

    /// Age in years, for living people.
    pub async fn age(&self) -> ImdbResult<Option<u64>> {
        let age = cached(&self.age, move || async move {
            let data = self.query("Age", "age {\n  value\n}").await?;
            Ok(person(&data)
                .path(&["age", "value"])
                .u64()
                .filter(|age| *age > 0))
        })
        .await?;
        Ok(*age)
    }

    /// Primary professions, e.g. `Actor`, `Director`.
    pub async fn professions(&self) -> ImdbResult<&[String]> {
        let professions = cached(&self.professions, move || async move {
            let data = self
                .query("Professions", "primaryProfessions {\n  category {\n    text\n  }\n}")
                .await?;
            Ok(person(&data)
                .get("primaryProfessions")
                .texts(&["category", "text"]))
        })
        .await?;
        Ok(professions)
    }

    /// Current popularity rank.
    pub async fn rank(&self) -> ImdbResult<Option<&Rank>> {
        let rank = cached(&self.rank, move || async move {
            let data = self
                .query(
                    "Rank",
                    "meterRanking {\n  currentRank\n  rankChange {\n    changeDirection\n    difference\n  }\n}",
                )
                .await?;
            Ok(rank_from(person(&data).get("meterRanking")))
        })
        .await?;
        Ok(rank.as_ref())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Biography
    // ─────────────────────────────────────────────────────────────────────────

    /// Name at birth.
    pub async fn birth_name(&self) -> ImdbResult<Option<&str>> {
        let name = cached(&self.birth_name, move || async move {
            let data = self.query("BirthName", "birthName {\n  text\n}").await?;
            Ok(person(&data).path(&["birthName", "text"]).non_empty_string())
        })
        .await?;
        Ok(name.as_deref())
    }

    /// Nicknames.
    pub async fn nicknames(&self) -> ImdbResult<&[String]> {
        let names = cached(&self.nicknames, move || async move {
            let data = self.query("NickName", "nickNames {\n  text\n}").await?;
            Ok(person(&data).get("nickNames").texts(&["text"]))
        })
        .await?;
        Ok(names)
    }

    /// Alternative names the person is credited under.
    pub async fn aka_names(&self) -> ImdbResult<&[String]> {
        let names = cached(&self.aka_names, move || async move {
            let nodes = self
                .nodes(Connection::new("AkaName", "akas", "text"))
                .await?;
            Ok(texts_of(&nodes, &["text"]))
        })
        .await?;
        Ok(names)
    }

    /// Birth date and place.
    pub async fn birth(&self) -> ImdbResult<&Birth> {
        cached(&self.birth, move || async move {
            let data = self
                .query(
                    "BirthDate",
                    "birthDate {\n  dateComponents {\n    day\n    month\n    year\n  }\n}\nbirthLocation {\n  text\n}",
                )
                .await?;
            let name = person(&data);
            Ok(Birth {
                date: normalize_date(name.path(&["birthDate", "dateComponents"])),
                place: name.path(&["birthLocation", "text"]).string(),
            })
        })
        .await
    }

    /// Death date, place, cause and status.
    pub async fn death(&self) -> ImdbResult<&Death> {
        cached(&self.death, move || async move {
            let data = self
                .query(
                    "DeathDate",
                    "deathDate {\n  dateComponents {\n    day\n    month\n    year\n  }\n}\ndeathLocation {\n  text\n}\ndeathCause {\n  text\n}\ndeathStatus",
                )
                .await?;
            let name = person(&data);
            Ok(Death {
                date: normalize_date(name.path(&["deathDate", "dateComponents"])),
                place: name.path(&["deathLocation", "text"]).string(),
                cause: name.path(&["deathCause", "text"]).string(),
                status: name.get("deathStatus").string(),
            })
        })
        .await
    }

    /// Body height.
    pub async fn height(&self) -> ImdbResult<Option<&Height>> {
        let height = cached(&self.height, move || async move {
            let data = self
                .query(
                    "BodyHeight",
                    "height {\n  displayableProperty {\n    value {\n      plainText\n    }\n  }\n}",
                )
                .await?;
            Ok(person(&data)
                .path(&["height", "displayableProperty", "value", "plainText"])
                .str()
                .and_then(parse_height))
        })
        .await?;
        Ok(height.as_ref())
    }

    /// Marriages, in service order.
    pub async fn spouses(&self) -> ImdbResult<&[Spouse]> {
        let spouses = cached(&self.spouses, move || async move {
            let data = self.query("Spouses", SPOUSES_SELECTION).await?;
            Ok(person(&data).get("spouses").items().map(spouse_from).collect())
        })
        .await?;
        Ok(spouses)
    }

    /// Children, including those without a page of their own.
    pub async fn children(&self) -> ImdbResult<&[Relative]> {
        self.relations(&self.children, "Children", RelationshipType::Children)
            .await
    }

    /// Parents.
    pub async fn parents(&self) -> ImdbResult<&[Relative]> {
        self.relations(&self.parents, "Parents", RelationshipType::Parents)
            .await
    }

    /// Relatives other than children and parents.
    pub async fn relatives(&self) -> ImdbResult<&[Relative]> {
        self.relations(&self.relatives, "Relatives", RelationshipType::Others)
            .await
    }

    async fn relations<'a>(
        &'a self,
        memo: &'a Memo<Vec<Relative>>,
        operation: &'static str,
        kind: RelationshipType,
    ) -> ImdbResult<&'a [Relative]> {
        let relatives = cached(memo, move || async move {
            let connection = Connection::new(operation, "relations", RELATION_FRAGMENT)
                .with_filter(FilterClause::RelationshipType(kind));
            let nodes = self.nodes(connection).await?;
            Ok(nodes
                .iter()
                .filter_map(|node| relative_from(Nav::new(node)))
                .collect())
        })
        .await?;
        Ok(relatives)
    }

    /// Mini biographies with their authors.
    pub async fn bio(&self) -> ImdbResult<&[MiniBio]> {
        let bios = cached(&self.bio, move || async move {
            let nodes = self
                .nodes(Connection::new(
                    "MiniBio",
                    "bios",
                    "text {\n  plainText\n}\nauthor {\n  plainText\n}",
                ))
                .await?;
            Ok(nodes
                .iter()
                .map(|node| {
                    let node = Nav::new(node);
                    MiniBio {
                        text: node.path(&["text", "plainText"]).string(),
                        author: node.path(&["author", "plainText"]).string(),
                    }
                })
                .collect())
        })
        .await?;
        Ok(bios)
    }

    /// Trivia items.
    pub async fn trivia(&self) -> ImdbResult<&[String]> {
        self.plain_texts(&self.trivia, "Trivia", "trivia").await
    }

    /// Personal quotes.
    pub async fn quotes(&self) -> ImdbResult<&[String]> {
        self.plain_texts(&self.quotes, "Quotes", "quotes").await
    }

    /// Trademarks, e.g. a signature look or voice.
    pub async fn trademarks(&self) -> ImdbResult<&[String]> {
        self.plain_texts(&self.trademarks, "Trademarks", "trademarks")
            .await
    }

    async fn plain_texts<'a>(
        &'a self,
        memo: &'a Memo<Vec<String>>,
        operation: &'static str,
        field: &'static str,
    ) -> ImdbResult<&'a [String]> {
        let texts = cached(memo, move || async move {
            let nodes = self
                .nodes(Connection::new(operation, field, "text {\n  plainText\n}"))
                .await?;
            Ok(texts_of(&nodes, &["text", "plainText"]))
        })
        .await?;
        Ok(texts)
    }

    /// Salaries per title.
    pub async fn salaries(&self) -> ImdbResult<&[Salary]> {
        let salaries = cached(&self.salaries, move || async move {
            let nodes = self
                .nodes(Connection::new("Salaries", "titleSalaries", SALARY_FRAGMENT))
                .await?;
            Ok(nodes.iter().map(|node| salary_from(Nav::new(node))).collect())
        })
        .await?;
        Ok(salaries)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publicity
    // ─────────────────────────────────────────────────────────────────────────

    /// Books and articles about the person.
    pub async fn print_biographies(&self) -> ImdbResult<&[PrintBiography]> {
        let prints = cached(&self.print_biographies, move || async move {
            let connection = Connection::new(
                "PubPrint",
                "publicityListings",
                "... on NamePrintBiography {\n  title {\n    text\n  }\n  authors {\n    plainText\n  }\n  isbn\n  publisher\n}",
            )
            .with_filter(FilterClause::Categories(vec![
                "namePrintBiography".to_string(),
            ]));
            let nodes = self.nodes(connection).await?;
            Ok(nodes
                .iter()
                .map(|node| {
                    let node = Nav::new(node);
                    PrintBiography {
                        title: node.path(&["title", "text"]).string(),
                        authors: node.get("authors").texts(&["plainText"]),
                        publisher: node.get("publisher").string(),
                        isbn: node.get("isbn").string(),
                    }
                })
                .collect())
        })
        .await?;
        Ok(prints)
    }

    /// Biographical films and episodes.
    pub async fn film_biographies(&self) -> ImdbResult<&[FilmBiography]> {
        let films = cached(&self.film_biographies, move || async move {
            let connection =
                Connection::new("PubFilm", "publicityListings", FILM_BIOGRAPHY_FRAGMENT)
                    .with_filter(FilterClause::Categories(vec![
                        "nameFilmBiography".to_string(),
                    ]));
            let nodes = self.nodes(connection).await?;
            Ok(nodes
                .iter()
                .map(|node| film_biography_from(Nav::new(node).get("title")))
                .collect())
        })
        .await?;
        Ok(films)
    }

    /// Titles in which the person is portrayed.
    pub async fn portrayals(&self) -> ImdbResult<&[Portrayal]> {
        let portrayals = cached(&self.portrayals, move || async move {
            let connection = Connection::new(
                "PubPortrayal",
                "publicityListings",
                format!("... on NamePortrayal {{\n{TITLE_FRAGMENT}\n}}"),
            )
            .with_filter(FilterClause::Categories(vec!["namePortrayal".to_string()]));
            let nodes = self.nodes(connection).await?;
            Ok(nodes
                .iter()
                .map(|node| {
                    let title = Nav::new(node).get("title");
                    Portrayal {
                        title: title.path(&["titleText", "text"]).string(),
                        title_id: title.get("id").entity_id(EntityKind::Title),
                        year: title.path(&["releaseYear", "year"]).i64(),
                    }
                })
                .collect())
        })
        .await?;
        Ok(portrayals)
    }

    /// Work outside film and television.
    pub async fn other_works(&self) -> ImdbResult<&[OtherWork]> {
        let works = cached(&self.other_works, move || async move {
            let nodes = self
                .nodes(Connection::new(
                    "PubOther",
                    "otherWorks",
                    "category {\n  text\n}\nfromDate\ntoDate\ntext {\n  plainText\n}",
                ))
                .await?;
            Ok(nodes
                .iter()
                .map(|node| {
                    let node = Nav::new(node);
                    OtherWork {
                        category: node.path(&["category", "text"]).string(),
                        from_date: normalize_date(node.get("fromDate")),
                        to_date: normalize_date(node.get("toDate")),
                        text: node.path(&["text", "plainText"]).string(),
                    }
                })
                .collect())
        })
        .await?;
        Ok(works)
    }

    /// External links by category, review links excluded.
    pub async fn external_sites(&self) -> ImdbResult<&ExternalSites> {
        cached(&self.external_sites, move || async move {
            let connection = Connection::new(
                "ExternalSites",
                "externalLinks",
                "label\nurl\nexternalLinkCategory {\n  id\n}\nexternalLinkLanguages {\n  text\n}",
            )
            .with_filter(FilterClause::ExcludeCategories("review".to_string()));
            let nodes = self.nodes(connection).await?;
            let mut sites = ExternalSites::default();
            for node in &nodes {
                let node = Nav::new(node);
                sites.push(
                    node.path(&["externalLinkCategory", "id"]).str(),
                    ExternalSite {
                        label: node.get("label").non_empty_string(),
                        url: node.get("url").non_empty_string(),
                        languages: node.get("externalLinkLanguages").texts(&["text"]),
                    },
                );
            }
            Ok(sites)
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Awards and credits
    // ─────────────────────────────────────────────────────────────────────────

    /// Award nominations matching `filter`, most prestigious first.
    ///
    /// Results are kept per filter.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn awards(&self, filter: &AwardFilter) -> ImdbResult<Awards> {
        let memo = Arc::clone(self.awards.lock().entry(filter.clone()).or_default());
        let awards = cached(&*memo, move || async move {
            let connection = Connection::new("Award", "awardNominations", AWARD_FRAGMENT)
                .with_filter(FilterClause::Sort {
                    by: "PRESTIGIOUS".to_string(),
                    order: SortOrder::Desc,
                })
                .with_filter(FilterClause::Awards {
                    wins_only: filter.wins_only,
                    event: filter.event.clone(),
                });
            let nodes = self.nodes(connection).await?;
            let mut awards = Awards::default();
            for node in &nodes {
                let node = Nav::new(node);
                let event = node.path(&["award", "event", "text"]).string();
                awards.push(event, self.nomination_from(node));
            }
            debug!(
                wins = awards.total.win,
                nominations = awards.total.nom,
                "awards collected"
            );
            Ok(awards)
        })
        .await?;
        Ok(awards.clone())
    }

    fn nomination_from(&self, node: Nav<'_>) -> AwardNomination {
        let award = node.get("award");
        let winner = node.get("isWinner").bool().unwrap_or(false);
        let titles = node
            .path(&["awardedEntities", "secondaryAwardTitles"])
            .items()
            .map(|entry| {
                let title = entry.get("title");
                AwardTitle {
                    title_id: title.get("id").entity_id(EntityKind::Title),
                    title_name: title.path(&["titleText", "text"]).string(),
                    title_note: entry
                        .path(&["note", "plainText"])
                        .str()
                        .map(trim_note),
                    image: self.title_image(title.get("primaryImage")),
                }
            })
            .collect();
        AwardNomination {
            year: award.path(&["eventEdition", "year"]).i64(),
            winner,
            category: award.path(&["category", "text"]).string(),
            name: award.get("text").string(),
            notes: award.path(&["notes", "plainText"]).string(),
            titles,
            outcome: if winner {
                AwardOutcome::Winner
            } else {
                AwardOutcome::Nominee
            },
        }
    }

    /// Titles the person is best known for.
    pub async fn known_for(&self) -> ImdbResult<&[KnownFor]> {
        let known_for = cached(&self.known_for, move || async move {
            let nodes = self
                .nodes(Connection::new("KnownFor", "knownFor", KNOWN_FOR_FRAGMENT))
                .await?;
            Ok(nodes
                .iter()
                .map(|node| {
                    let credit = Nav::new(node).get("credit");
                    let title = credit.get("title");
                    KnownFor {
                        title: title.path(&["titleText", "text"]).string(),
                        title_id: title.get("id").entity_id(EntityKind::Title),
                        year: title.path(&["releaseYear", "year"]).i64(),
                        end_year: title.path(&["releaseYear", "endYear"]).i64(),
                        characters: credit.get("characters").texts(&["name"]),
                        image: self.title_image(title.get("primaryImage")),
                    }
                })
                .collect())
        })
        .await?;
        Ok(known_for)
    }

    /// Full filmography grouped by credit category.
    #[instrument(skip(self), fields(id = %self.id))]
    pub async fn credits(&self) -> ImdbResult<&Credits> {
        cached(&self.credits, move || async move {
            let nodes = self
                .nodes(Connection::new("Credits", "credits", CREDIT_FRAGMENT))
                .await?;
            let mut credits = Credits::default();
            for node in &nodes {
                let node = Nav::new(node);
                let title = node.get("title");
                let category = node
                    .path(&["category", "id"])
                    .str()
                    .unwrap_or("miscellaneous");
                credits.push(
                    category,
                    Credit {
                        title_id: title.get("id").entity_id(EntityKind::Title),
                        title_name: title.path(&["titleText", "text"]).string(),
                        title_type: title.path(&["titleType", "text"]).string(),
                        year: title.path(&["releaseYear", "year"]).i64(),
                        end_year: title.path(&["releaseYear", "endYear"]).i64(),
                        characters: node.get("characters").texts(&["name"]),
                        jobs: node.get("jobs").texts(&["text"]),
                        image: self.title_image(title.get("primaryImage")),
                    },
                );
            }
            Ok(credits)
        })
        .await
    }

    /// The id this person now redirects to, if it was merged into another.
    ///
    /// Always asks the service; never cached.
    pub async fn check_redirect(&self) -> ImdbResult<Option<EntityId>> {
        Ok(self.engine.canonical_id(&self.id).await?)
    }
}

async fn cached<'a, T, F, Fut>(memo: &'a Memo<T>, fetch: F) -> ImdbResult<&'a T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ImdbResult<T>>,
{
    memo.get_or_try_fetch(fetch).await
}

fn person(data: &Value) -> Nav<'_> {
    Nav::new(data).get("name")
}

fn texts_of(nodes: &[Value], path: &[&str]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| Nav::new(node).path(path).non_empty_string())
        .collect()
}

fn rank_from(ranking: Nav<'_>) -> Option<Rank> {
    let current_rank = ranking.get("currentRank").u64().filter(|rank| *rank > 0)?;
    Some(Rank {
        current_rank,
        change_direction: ranking.path(&["rankChange", "changeDirection"]).string(),
        difference: ranking.path(&["rankChange", "difference"]).i64(),
    })
}

/// `(screenplay)` to `screenplay`.
fn trim_note(note: &str) -> String {
    note.trim_matches(|c| matches!(c, ' ' | '(' | ')')).to_string()
}

/// Split `6' 2" (1.88 m)` into imperial and metric parts.
fn parse_height(text: &str) -> Option<Height> {
    if text.trim().is_empty() {
        return None;
    }
    let mut parts = text.split('(');
    let imperial = parts.next().unwrap_or_default().trim().to_string();
    let metric = parts
        .next()
        .map(|metric| metric.trim_matches(|c| matches!(c, ' ' | 'm' | ')')))
        .filter(|metric| !metric.is_empty())
        .map(str::to_string);
    Some(Height { imperial, metric })
}

fn spouse_from(entry: Nav<'_>) -> Spouse {
    let range = entry.get("timeRange");
    let mut comments = Vec::new();
    let mut children = 0;
    for attribute in entry.get("attributes").texts(&["text"]) {
        if attribute.to_lowercase().contains("child") {
            let digits: String = attribute.chars().filter(char::is_ascii_digit).collect();
            children = digits.parse().unwrap_or(0);
        } else {
            comments.push(attribute);
        }
    }
    Spouse {
        id: entry
            .path(&["spouse", "name", "id"])
            .entity_id(EntityKind::Name),
        name: entry.path(&["spouse", "asMarkdown", "plainText"]).string(),
        from: normalize_date(range.path(&["fromDate", "dateComponents"])),
        to: normalize_date(range.path(&["toDate", "dateComponents"])),
        date_text: range
            .path(&["displayableProperty", "value", "plainText"])
            .string(),
        comment: (!comments.is_empty()).then(|| comments.join(", ")),
        children,
        current: entry.get("current").bool(),
    }
}

/// `None` when the relation names nobody.
fn relative_from(node: Nav<'_>) -> Option<Relative> {
    let relation_name = node.get("relationName");
    let linked = relation_name.get("name");
    let (id, name) = if linked.is_present() {
        (
            linked.get("id").entity_id(EntityKind::Name),
            linked.path(&["nameText", "text"]).string(),
        )
    } else {
        (None, Some(relation_name.get("nameText").non_empty_string()?))
    };
    Some(Relative {
        id,
        name,
        relation: node.path(&["relationshipType", "text"]).string(),
    })
}

fn salary_from(node: Nav<'_>) -> Salary {
    let title = node.get("title");
    Salary {
        title_id: title.get("id").entity_id(EntityKind::Title),
        title: title.path(&["titleText", "text"]).string(),
        year: title.path(&["releaseYear", "year"]).i64(),
        amount: node.path(&["amount", "amount"]).f64(),
        currency: node.path(&["amount", "currency"]).string(),
        comments: node.get("attributes").texts(&["text"]),
    }
}

fn film_biography_from(title: Nav<'_>) -> FilmBiography {
    let series = title.get("series");
    FilmBiography {
        title: title.path(&["titleText", "text"]).string(),
        title_id: title.get("id").entity_id(EntityKind::Title),
        year: title.path(&["releaseYear", "year"]).i64(),
        series_title: series.path(&["series", "titleText", "text"]).string(),
        series_season: series
            .path(&["displayableEpisodeNumber", "displayableSeason", "text"])
            .string(),
        series_episode: series
            .path(&["displayableEpisodeNumber", "episodeNumber", "text"])
            .string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heights_split_into_imperial_and_metric() {
        assert_eq!(
            parse_height("6' 2\" (1.88 m)"),
            Some(Height {
                imperial: "6' 2\"".to_string(),
                metric: Some("1.88".to_string()),
            })
        );
        assert_eq!(
            parse_height("5' 9\""),
            Some(Height {
                imperial: "5' 9\"".to_string(),
                metric: None,
            })
        );
        assert_eq!(parse_height("  "), None);
    }

    #[test]
    fn spouse_attributes_split_into_children_and_comments() {
        let entry = json!({
            "spouse": {"name": {"id": "nm0000001"}, "asMarkdown": {"plainText": "Jane Doe"}},
            "timeRange": {
                "fromDate": {"dateComponents": {"day": 4, "month": 6, "year": 1990}},
                "toDate": null,
                "displayableProperty": {"value": {"plainText": "June 4, 1990 - present"}}
            },
            "attributes": [{"text": "2 children"}, {"text": "divorced"}, {"text": null}],
            "current": true
        });
        let spouse = spouse_from(Nav::new(&entry));
        assert_eq!(spouse.id.as_ref().map(EntityId::as_str), Some("0000001"));
        assert_eq!(spouse.name.as_deref(), Some("Jane Doe"));
        assert_eq!(spouse.from.month_name, Some("June"));
        assert_eq!(spouse.to.year, None);
        assert_eq!(spouse.children, 2);
        assert_eq!(spouse.comment.as_deref(), Some("divorced"));
        assert_eq!(spouse.current, Some(true));
    }

    #[test]
    fn relatives_without_a_name_are_skipped() {
        let linked = json!({
            "relationName": {"name": {"id": "nm0000002", "nameText": {"text": "Sam"}}},
            "relationshipType": {"text": "Son"}
        });
        let unlinked = json!({
            "relationName": {"name": null, "nameText": "Alex"},
            "relationshipType": {"text": "Daughter"}
        });
        let nobody = json!({"relationName": {"name": null, "nameText": ""}});

        let sam = relative_from(Nav::new(&linked)).unwrap();
        assert_eq!(sam.id.as_ref().map(EntityId::as_str), Some("0000002"));
        assert_eq!(sam.relation.as_deref(), Some("Son"));

        let alex = relative_from(Nav::new(&unlinked)).unwrap();
        assert_eq!(alex.id, None);
        assert_eq!(alex.name.as_deref(), Some("Alex"));

        assert_eq!(relative_from(Nav::new(&nobody)), None);
    }

    #[test]
    fn rank_requires_a_current_rank() {
        let ranked = json!({"currentRank": 12, "rankChange": {"changeDirection": "UP", "difference": 3}});
        let rank = rank_from(Nav::new(&ranked)).unwrap();
        assert_eq!(rank.current_rank, 12);
        assert_eq!(rank.change_direction.as_deref(), Some("UP"));
        assert_eq!(rank.difference, Some(3));

        assert_eq!(rank_from(Nav::new(&json!({"currentRank": null}))), None);
    }

    #[test]
    fn hollow_nodes_map_to_empty_records() {
        for node in [json!({}), json!({"title": null, "amount": null, "series": null})] {
            let salary = salary_from(Nav::new(&node));
            assert_eq!(salary.title_id, None);
            assert_eq!(salary.amount, None);
            assert!(salary.comments.is_empty());
            assert_eq!(salary.title, None);
            assert_eq!(salary.year, None);
            assert_eq!(salary.currency, None);

            let film = film_biography_from(Nav::new(&node).get("title"));
            assert_eq!(film.title, None);
            assert_eq!(film.series_title, None);
            assert_eq!(film.series_episode, None);

            let spouse = spouse_from(Nav::new(&node));
            assert_eq!(spouse.id, None);
            assert_eq!(spouse.from.month_name, None);
            assert_eq!(spouse.children, 0);
            assert_eq!(spouse.comment, None);

            assert_eq!(relative_from(Nav::new(&node)), None);
            assert_eq!(rank_from(Nav::new(&node).get("meterRanking")), None);
        }
    }

    #[test]
    fn notes_lose_their_parentheses() {
        assert_eq!(trim_note(" (screenplay/director) "), "screenplay/director");
    }

    #[test]
    fn film_biographies_read_series_details() {
        let title = json!({
            "titleText": {"text": "Episode"},
            "id": "tt0000009",
            "releaseYear": {"year": 2001},
            "series": {
                "displayableEpisodeNumber": {
                    "displayableSeason": {"text": "2"},
                    "episodeNumber": {"text": "7"}
                },
                "series": {"titleText": {"text": "Show"}}
            }
        });
        let film = film_biography_from(Nav::new(&title));
        assert_eq!(film.series_title.as_deref(), Some("Show"));
        assert_eq!(film.series_season.as_deref(), Some("2"));
        assert_eq!(film.series_episode.as_deref(), Some("7"));
        assert_eq!(film.year, Some(2001));
    }
}
