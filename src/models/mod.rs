pub mod article;
pub mod category;
pub mod message;
pub mod topic;
pub mod user;

pub use article::{Entity as Article, Model as ArticleModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use message::{Entity as Message, Model as MessageModel};
pub use topic::{Entity as Topic, Model as TopicModel};
pub use user::{Entity as User, Model as UserModel, UserRole};
