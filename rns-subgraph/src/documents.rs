//! GraphQL documents.

/// Every name, newest registration first. Variables: `first`, `skip`.
pub const GET_ALL_NAMES: &str = r#"
query GetAllNames($first: Int!, $skip: Int!) {
  revoNames(first: $first, skip: $skip, orderBy: registrationDate, orderDirection: desc) {
    id
    name
    labelName
    owner
    registrationDate
    expiryDate
    expiryDateWithGrace
  }
}
"#;

/// Names owned by an address, soonest expiry first. Variables: `owner`, `first`, `skip`.
pub const GET_NAMES_BY_OWNER: &str = r#"
query GetNamesByOwner($owner: String!, $first: Int!, $skip: Int!) {
  revoNames(where: { owner: $owner }, first: $first, skip: $skip, orderBy: expiryDate, orderDirection: asc) {
    id
    name
    labelName
    owner
    registrationDate
    expiryDate
    expiryDateWithGrace
  }
}
"#;

/// A single name by label. Variables: `labelName`.
pub const GET_NAME_BY_LABEL: &str = r#"
query GetNameByLabel($labelName: String!) {
  revoNames(where: { labelName: $labelName }, first: 1) {
    id
    name
    labelName
    owner
    registrationDate
    expiryDate
    expiryDateWithGrace
  }
}
"#;
