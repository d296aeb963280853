use regform::form::FormModel;

#[derive(FormModel)]
enum ContactChannel {
    Email(String),
    Mobile(String),
}

fn main() {}
