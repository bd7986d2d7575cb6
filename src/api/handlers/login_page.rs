use axum::response::Html;

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Sign in</title>
</head>
<body>
  <main>
    <h1>Sign in</h1>
    <form id="login">
      <label>Username <input name="username" autocomplete="username" required></label>
      <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
      <button type="submit">Sign in</button>
      <p id="error" role="alert"></p>
    </form>
  </main>
  <script>
    document.getElementById("login").addEventListener("submit", async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const response = await fetch("/api/user-login", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({
          username: form.get("username"),
          password: form.get("password"),
        }),
      });
      if (response.ok) {
        window.location.assign("/");
      } else {
        const body = await response.json().catch(() => ({}));
        document.getElementById("error").textContent = body.error || "Sign in failed";
      }
    });
  </script>
</body>
</html>
"#;

/// Minimal sign-in form; the gate redirects here.
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

const HOME_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>realmdesk</title>
</head>
<body>
  <main>
    <h1>Signed in</h1>
    <button id="logout" type="button">Sign out</button>
  </main>
  <script>
    document.getElementById("logout").addEventListener("click", async () => {
      await fetch("/api/user-logout", { method: "POST" });
      window.location.assign("/login");
    });
  </script>
</body>
</html>
"#;

/// Landing page behind the gate.
pub async fn home_page() -> Html<&'static str> {
    Html(HOME_PAGE)
}
