//! Association Resolution Tests
//!
//! Relationship metadata for the blog fixture:
//! - belongs_to / has_one / has_many / many_to_many key derivation
//! - Polymorphic parents follow the live registry
//! - Related types resolve lazily

use adminql::association::{describe_associations, AssociationKind, ParentRef, TypeRef, TypeRegistry};
use adminql::config::AdminConfig;
use adminql::schema::{Catalog, RawColumn, RecordType, RelationshipDecl, TypeDecl};
use adminql::AssociationDescriptor;

// =============================================================================
// Helper Functions
// =============================================================================

fn blog_catalog() -> Catalog {
    let decls = vec![
        TypeDecl::new("ARBlog")
            .column(RawColumn::new("id", "integer").primary())
            .column(RawColumn::new("name", "varchar(255)"))
            .relationship(RelationshipDecl::has_many("a_r_posts"))
            .relationship(RelationshipDecl::has_many("a_r_comments").as_role("commentable")),
        TypeDecl::new("ARPost")
            .column(RawColumn::new("id", "integer").primary())
            .column(RawColumn::new("a_r_blog_id", "integer"))
            .column(RawColumn::new("title", "varchar(255)"))
            .relationship(RelationshipDecl::belongs_to("a_r_blog"))
            .relationship(RelationshipDecl::has_and_belongs_to_many("a_r_categories"))
            .relationship(RelationshipDecl::has_many("a_r_comments").as_role("commentable")),
        TypeDecl::new("ARCategory")
            .column(RawColumn::new("id", "integer").primary())
            .column(RawColumn::new("name", "varchar(255)"))
            .relationship(RelationshipDecl::has_and_belongs_to_many("a_r_posts")),
        TypeDecl::new("ARUser")
            .column(RawColumn::new("id", "integer").primary())
            .relationship(RelationshipDecl::has_one("a_r_profile")),
        TypeDecl::new("ARProfile")
            .column(RawColumn::new("id", "integer").primary())
            .column(RawColumn::new("a_r_user_id", "integer"))
            .relationship(RelationshipDecl::belongs_to("a_r_user")),
        TypeDecl::new("ARComment")
            .column(RawColumn::new("id", "integer").primary())
            .column(RawColumn::new("commentable_id", "integer"))
            .column(RawColumn::new("commentable_type", "varchar(255)"))
            .relationship(RelationshipDecl::belongs_to("commentable").polymorphic()),
    ];

    let mut catalog = Catalog::new();
    for decl in decls {
        catalog.register(decl).unwrap();
    }
    catalog
}

fn describe(catalog: &Catalog, registry: &TypeRegistry, name: &str) -> Vec<AssociationDescriptor> {
    let record = catalog.record_type(name).unwrap();
    describe_associations(&record, catalog, registry, &AdminConfig::default()).unwrap()
}

fn named<'a>(descriptors: &'a [AssociationDescriptor], name: &str) -> &'a AssociationDescriptor {
    descriptors.iter().find(|d| d.name == name).unwrap()
}

fn names(types: &[RecordType]) -> Vec<&str> {
    types.iter().map(|t| t.name()).collect()
}

// =============================================================================
// Key Derivation Tests
// =============================================================================

/// has_many keys live on the child side.
#[test]
fn test_has_many_child_key() {
    let catalog = blog_catalog();
    let registry = catalog.registry();
    let posts = describe(&catalog, &registry, "ARBlog");
    let posts = named(&posts, "a_r_posts");

    assert_eq!(posts.kind, AssociationKind::HasMany);
    assert_eq!(posts.parent_key, ["id"]);
    assert_eq!(posts.child_key, "ar_blog_id");
    assert_eq!(posts.resolve_child_type(&registry).unwrap().name(), "ARPost");
}

/// Many-to-many keys point at each owner from the join relation.
#[test]
fn test_many_to_many_both_sides() {
    let catalog = blog_catalog();
    let registry = catalog.registry();

    let from_post = describe(&catalog, &registry, "ARPost");
    let categories = named(&from_post, "a_r_categories");
    assert_eq!(categories.kind, AssociationKind::ManyToMany);
    assert_eq!(categories.parent_key, ["id"]);
    assert_eq!(categories.child_key, "ar_post_id");
    assert_eq!(categories.resolve_child_type(&registry).unwrap().name(), "ARCategory");

    let from_category = describe(&catalog, &registry, "ARCategory");
    let posts = named(&from_category, "a_r_posts");
    assert_eq!(posts.child_key, "ar_category_id");
    assert_eq!(posts.resolve_child_type(&registry).unwrap().name(), "ARPost");
}

/// has_one and its belongs_to inverse agree on the parent type.
#[test]
fn test_has_one_and_belongs_to() {
    let catalog = blog_catalog();
    let registry = catalog.registry();

    let user = describe(&catalog, &registry, "ARUser");
    let profile = named(&user, "a_r_profile");
    assert_eq!(profile.kind, AssociationKind::HasOne);
    assert_eq!(profile.child_key, "ar_user_id");

    let profile_side = describe(&catalog, &registry, "ARProfile");
    let owner = named(&profile_side, "a_r_user");
    assert_eq!(owner.pretty_name, "A r user");
    assert_eq!(owner.child_key, "a_r_user_id");
    let parents = owner.resolve_parent_types(&registry, &catalog).unwrap();
    assert_eq!(names(&parents), ["ARUser"]);
}

// =============================================================================
// Polymorphic Tests
// =============================================================================

/// Polymorphic parents are every type declaring the role.
#[test]
fn test_polymorphic_parents() {
    let catalog = blog_catalog();
    let registry = catalog.registry();
    let comment = describe(&catalog, &registry, "ARComment");
    let commentable = named(&comment, "commentable");

    assert!(commentable.is_polymorphic);
    assert_eq!(commentable.foreign_type_column.as_deref(), Some("commentable_type"));
    assert_eq!(commentable.child_key, "commentable_id");
    assert_eq!(
        commentable.parent_type,
        ParentRef::Polymorphic {
            role: "commentable".into()
        }
    );

    let parents = commentable.resolve_parent_types(&registry, &catalog).unwrap();
    assert_eq!(names(&parents), ["ARBlog", "ARPost"]);
}

/// The parent set is recomputed from the live registry on every call.
#[test]
fn test_polymorphic_parents_follow_registry() {
    let catalog = blog_catalog();
    let registry = catalog.registry();
    let comment = describe(&catalog, &registry, "ARComment");
    let commentable = named(&comment, "commentable");

    registry.unregister("ARBlog");
    let parents = commentable.resolve_parent_types(&registry, &catalog).unwrap();
    assert_eq!(names(&parents), ["ARPost"]);

    registry.clear();
    assert!(commentable
        .resolve_parent_types(&registry, &catalog)
        .unwrap()
        .is_empty());

    registry.register(catalog.record_type("ARPost").unwrap());
    registry.register(catalog.record_type("ARBlog").unwrap());
    let parents = commentable.resolve_parent_types(&registry, &catalog).unwrap();
    assert_eq!(names(&parents), ["ARPost", "ARBlog"]);
}

/// The owning side of an `as:` association records its discriminator value.
#[test]
fn test_polymorphic_owner_side() {
    let catalog = blog_catalog();
    let registry = catalog.registry();
    let blog = describe(&catalog, &registry, "ARBlog");
    let comments = named(&blog, "a_r_comments");

    assert_eq!(comments.child_key, "commentable_id");
    assert_eq!(comments.polymorphic_discriminator.as_deref(), Some("ARBlog"));
    assert!(comments.foreign_type_column.is_none());
}

// =============================================================================
// Lazy Resolution Tests
// =============================================================================

/// Describing never requires targets to be registered.
#[test]
fn test_descriptors_build_against_empty_registry() {
    let catalog = blog_catalog();
    let empty = TypeRegistry::new();
    let post = describe(&catalog, &empty, "ARPost");

    let blog = named(&post, "a_r_blog");
    assert_eq!(blog.parent_type, ParentRef::Single(TypeRef::Unresolved("ARBlog".into())));
    assert!(blog.target().unwrap().resolve(&empty).unwrap_err().is_resolution());

    let registry = catalog.registry();
    assert_eq!(blog.target().unwrap().resolve(&registry).unwrap().name(), "ARBlog");
}

/// Describing twice yields identical descriptors.
#[test]
fn test_description_is_deterministic() {
    let catalog = blog_catalog();
    let registry = catalog.registry();
    let first = describe(&catalog, &registry, "ARPost");

    for _ in 0..10 {
        assert_eq!(describe(&catalog, &registry, "ARPost"), first);
    }
}
