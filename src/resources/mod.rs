//! Per-resource API operations and their wire types.
//!
//! Each service borrows the client's [`Engine`](crate::http::Engine), builds
//! a path (plus query string or JSON body) and decodes the response:
//!
//! - [`Emails`]: lookup, listing and cancellation of sent email
//! - [`Templates`], [`Domains`], [`ApiKeys`]: account configuration
//! - [`Contacts`], [`Broadcasts`]: audience and bulk sends
//! - [`Suppressions`], [`Tracking`]: delivery policy

mod api_keys;
mod broadcasts;
mod contacts;
mod domains;
mod emails;
mod list;
mod suppressions;
mod templates;
mod tracking;

#[cfg(test)]
mod settings_tests;

pub use api_keys::{
    ApiKeyInfo, ApiKeyMode, ApiKeyPermission, ApiKeyWithSecret, ApiKeys, CreateApiKeyRequest,
};
pub use broadcasts::{
    Broadcast, BroadcastAnalytics, BroadcastRecipient, Broadcasts, CreateBroadcastRequest,
    ListBroadcastsOptions, ListRecipientsOptions, ScheduleBroadcastRequest, SendBroadcastRequest,
    TestBroadcastRequest, TestBroadcastResponse, UpdateBroadcastRequest,
};
pub use contacts::{
    AudienceStats, BatchContactInput, BatchContactResponse, Contact, Contacts,
    CreateContactRequest, ListContactsOptions, UpdateContactRequest,
};
pub use domains::{
    DnsRecord, Domain, DomainStatus, DomainVerificationResult, DomainWithDnsRecords, Domains,
};
pub use emails::{
    Attachment, AttachmentMeta, BatchEmailResult, EmailDetail, EmailStatus, Emails,
    ListEmailsOptions, SendBatchResponse, SendEmailRequest, SendEmailResponse,
};
pub use list::{ListOptions, ListResponse};
pub use suppressions::{Suppression, Suppressions};
pub use templates::{
    CreateTemplateRequest, Template, Templates, TestTemplateRequest, TestTemplateResponse,
    UpdateTemplateRequest,
};
pub use tracking::{Tracking, TrackingDefaults, UpdateTrackingDefaultsRequest};
